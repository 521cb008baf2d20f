use redb::TableDefinition;

/// Comic records: uuid -> Comic (msgpack)
pub const COMICS: TableDefinition<&str, &[u8]> = TableDefinition::new("comics");

/// Creator index: user uuid -> msgpack Vec of comic UUIDs
pub const CREATOR_COMICS: TableDefinition<&str, &[u8]> = TableDefinition::new("creator_comics");

/// Chapter records: uuid -> Chapter (msgpack)
pub const CHAPTERS: TableDefinition<&str, &[u8]> = TableDefinition::new("chapters");

/// Chapter index: comic uuid -> msgpack Vec of chapter UUIDs
pub const COMIC_CHAPTERS: TableDefinition<&str, &[u8]> = TableDefinition::new("comic_chapters");

/// Tags: slug -> Tag (msgpack)
pub const TAGS: TableDefinition<&str, &[u8]> = TableDefinition::new("tags");

/// User records: uuid -> User (msgpack)
pub const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Username index: lowercase username -> uuid
pub const USERNAMES: TableDefinition<&str, &str> = TableDefinition::new("usernames");

/// Email index: lowercase email -> uuid
pub const EMAILS: TableDefinition<&str, &str> = TableDefinition::new("emails");

/// Library folders: uuid -> LibraryFolder (msgpack)
pub const FOLDERS: TableDefinition<&str, &[u8]> = TableDefinition::new("library_folders");

/// Folder owner index: user uuid -> msgpack Vec of folder UUIDs
pub const USER_FOLDERS: TableDefinition<&str, &[u8]> = TableDefinition::new("user_folders");

/// Folder slug index: slug -> uuid (for public sharing links)
pub const FOLDER_SLUGS: TableDefinition<&str, &str> = TableDefinition::new("folder_slugs");
