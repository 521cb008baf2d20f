use chrono::{Duration, Utc};
use comic_manager::storage::models::{
    Chapter, ChapterImage, ChapterStatus, ChapterTranslation, Comic, ComicStatus,
    ComicTranslation, LibraryFolder, LibraryFolderItem, Role, SerializationStatus, Tag,
    TagTranslation, User, Visibility,
};
use comic_manager::storage::Database;

fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("data")).unwrap();
    (dir, db)
}

fn sample_comic(id: &str, creator_id: &str) -> Comic {
    let now = Utc::now();
    Comic {
        id: id.to_string(),
        creator_id: creator_id.to_string(),
        author: "Test Author".to_string(),
        status: ComicStatus::Draft,
        serialization_status: SerializationStatus::Ongoing,
        visibility: Visibility::Public,
        nsfw: false,
        cover_image_url: Some("https://cdn.test/media/drafts/u1/cover.png".to_string()),
        banner_image_url: None,
        schedule_publish_at: None,
        approved_at: None,
        rejection_reason: None,
        translations: vec![ComicTranslation {
            language: "en".to_string(),
            title: "Test Comic".to_string(),
            synopsis: Some("A test".to_string()),
            alt_title: None,
        }],
        tags: vec!["action".to_string()],
        created_at: now,
        updated_at: now,
    }
}

fn sample_chapter(id: &str, comic_id: &str, number: u32) -> Chapter {
    let now = Utc::now();
    Chapter {
        id: id.to_string(),
        comic_id: comic_id.to_string(),
        chapter_number: number,
        status: ChapterStatus::Published,
        published_at: Some(now),
        images: vec![ChapterImage {
            url: format!("https://cdn.test/media/drafts/u1/{id}.png"),
            order: 1,
        }],
        translations: vec![ChapterTranslation {
            language: "en".to_string(),
            title: format!("Chapter {number}"),
        }],
        created_at: now,
        updated_at: now,
    }
}

fn sample_user(id: &str, username: &str, email: &str) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: "pbkdf2-sha256$1$AA$AA".to_string(),
        role: Role::User,
        created_at: now,
        updated_at: now,
    }
}

fn sample_folder(id: &str, user_id: &str, slug: &str) -> LibraryFolder {
    let now = Utc::now();
    LibraryFolder {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: "Favourites".to_string(),
        description: None,
        is_public: true,
        is_default: false,
        slug: slug.to_string(),
        items: vec![LibraryFolderItem {
            comic_id: "comic-1".to_string(),
            order: 0,
            added_at: now,
        }],
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn test_put_and_get_comic() {
    let (_dir, db) = test_db();
    db.put_comic(&sample_comic("comic-1", "user-1")).unwrap();

    let retrieved = db.get_comic("comic-1").unwrap().expect("comic should exist");
    assert_eq!(retrieved.id, "comic-1");
    assert_eq!(retrieved.creator_id, "user-1");
    assert_eq!(retrieved.status, ComicStatus::Draft);
    assert_eq!(retrieved.tags, vec!["action".to_string()]);
    assert_eq!(retrieved.translation("en").unwrap().title, "Test Comic");
    assert!(retrieved.translation("th").is_none());
}

#[test]
fn test_get_comic_not_found() {
    let (_dir, db) = test_db();
    assert!(db.get_comic("missing").unwrap().is_none());
}

#[test]
fn test_list_comics_newest_update_first() {
    let (_dir, db) = test_db();
    let mut older = sample_comic("older", "user-1");
    older.updated_at = Utc::now() - Duration::hours(1);
    db.put_comic(&older).unwrap();
    db.put_comic(&sample_comic("newer", "user-1")).unwrap();

    let ids: Vec<String> = db.list_comics().unwrap().into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["newer".to_string(), "older".to_string()]);
}

#[test]
fn test_list_comics_by_status() {
    let (_dir, db) = test_db();
    let mut pending = sample_comic("pending", "user-1");
    pending.status = ComicStatus::PendingReview;
    db.put_comic(&pending).unwrap();
    db.put_comic(&sample_comic("draft", "user-1")).unwrap();

    let results = db.list_comics_by_status(ComicStatus::PendingReview).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "pending");
}

#[test]
fn test_list_comics_by_creator() {
    let (_dir, db) = test_db();
    db.put_comic(&sample_comic("a", "user-1")).unwrap();
    db.put_comic(&sample_comic("b", "user-1")).unwrap();
    db.put_comic(&sample_comic("c", "user-2")).unwrap();

    assert_eq!(db.list_comics_by_creator("user-1").unwrap().len(), 2);
    assert_eq!(db.list_comics_by_creator("user-2").unwrap().len(), 1);
    assert!(db.list_comics_by_creator("user-3").unwrap().is_empty());
}

#[test]
fn test_put_comic_twice_keeps_single_index_entry() {
    let (_dir, db) = test_db();
    let mut comic = sample_comic("comic-1", "user-1");
    db.put_comic(&comic).unwrap();
    comic.author = "Renamed".to_string();
    db.put_comic(&comic).unwrap();

    let comics = db.list_comics_by_creator("user-1").unwrap();
    assert_eq!(comics.len(), 1);
    assert_eq!(comics[0].author, "Renamed");
}

#[test]
fn test_delete_comic_removes_chapters_and_index() {
    let (_dir, db) = test_db();
    db.put_comic(&sample_comic("comic-1", "user-1")).unwrap();
    db.put_chapter(&sample_chapter("ch-1", "comic-1", 1)).unwrap();
    db.put_chapter(&sample_chapter("ch-2", "comic-1", 2)).unwrap();

    assert!(db.delete_comic("comic-1").unwrap());
    assert!(db.get_comic("comic-1").unwrap().is_none());
    assert!(db.get_chapter("ch-1").unwrap().is_none());
    assert!(db.get_chapters_for_comic("comic-1").unwrap().is_empty());
    assert!(db.list_comics_by_creator("user-1").unwrap().is_empty());
}

#[test]
fn test_delete_comic_nonexistent() {
    let (_dir, db) = test_db();
    assert!(!db.delete_comic("missing").unwrap());
}

#[test]
fn test_chapters_sorted_by_number() {
    let (_dir, db) = test_db();
    db.put_comic(&sample_comic("comic-1", "user-1")).unwrap();
    db.put_chapter(&sample_chapter("ch-3", "comic-1", 3)).unwrap();
    db.put_chapter(&sample_chapter("ch-1", "comic-1", 1)).unwrap();
    db.put_chapter(&sample_chapter("ch-2", "comic-1", 2)).unwrap();

    let numbers: Vec<u32> = db
        .get_chapters_for_comic("comic-1")
        .unwrap()
        .iter()
        .map(|c| c.chapter_number)
        .collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn test_save_comic_with_chapters() {
    let (_dir, db) = test_db();
    let mut comic = sample_comic("comic-1", "user-1");
    let mut chapter = sample_chapter("ch-1", "comic-1", 1);
    db.put_comic(&comic).unwrap();
    db.put_chapter(&chapter).unwrap();

    comic.status = ComicStatus::Published;
    chapter.images[0].url = "https://cdn.test/media/public/u1/ch-1.png".to_string();
    db.save_comic_with_chapters(&comic, std::slice::from_ref(&chapter))
        .unwrap();

    assert_eq!(
        db.get_comic("comic-1").unwrap().unwrap().status,
        ComicStatus::Published
    );
    let stored = db.get_chapter("ch-1").unwrap().unwrap();
    assert_eq!(stored.images[0].url, chapter.images[0].url);
    assert_eq!(db.get_chapters_for_comic("comic-1").unwrap().len(), 1);
}

#[test]
fn test_tags_by_slug() {
    let (_dir, db) = test_db();
    let now = Utc::now();
    db.put_tag(&Tag {
        id: "tag-1".to_string(),
        slug: "action".to_string(),
        tag_type: "genre".to_string(),
        translations: vec![TagTranslation {
            language: "en".to_string(),
            name: "Action".to_string(),
        }],
        created_at: now,
        updated_at: now,
    })
    .unwrap();

    assert_eq!(db.get_tag("action").unwrap().unwrap().id, "tag-1");
    let tags = db
        .get_tags(&["action".to_string(), "missing".to_string()])
        .unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].tag_type, "genre");
}

#[test]
fn test_user_lookup_by_identifier_is_case_insensitive() {
    let (_dir, db) = test_db();
    db.put_user(&sample_user("user-1", "Artist", "Artist@Example.com"))
        .unwrap();

    assert_eq!(
        db.find_user_by_identifier("artist").unwrap().unwrap().id,
        "user-1"
    );
    assert_eq!(
        db.find_user_by_identifier("artist@example.com")
            .unwrap()
            .unwrap()
            .id,
        "user-1"
    );
    assert!(db.find_user_by_identifier("nobody").unwrap().is_none());
    assert!(db.username_exists("ARTIST").unwrap());
    assert!(db.email_exists("artist@example.COM").unwrap());
}

#[test]
fn test_put_user_reindexes_changed_username() {
    let (_dir, db) = test_db();
    let mut user = sample_user("user-1", "old-name", "a@example.com");
    db.put_user(&user).unwrap();

    user.username = "new-name".to_string();
    db.put_user(&user).unwrap();

    assert!(!db.username_exists("old-name").unwrap());
    assert!(db.username_exists("new-name").unwrap());
}

#[test]
fn test_folder_by_slug_and_user() {
    let (_dir, db) = test_db();
    db.put_folder(&sample_folder("folder-1", "user-1", "favourites-1234"))
        .unwrap();

    let by_slug = db.get_folder_by_slug("favourites-1234").unwrap().unwrap();
    assert_eq!(by_slug.id, "folder-1");
    assert_eq!(by_slug.items.len(), 1);
    assert_eq!(db.get_user_folders("user-1").unwrap().len(), 1);
    assert!(db.get_user_folders("user-2").unwrap().is_empty());
}

#[test]
fn test_delete_folder_removes_indexes() {
    let (_dir, db) = test_db();
    db.put_folder(&sample_folder("folder-1", "user-1", "favourites-1234"))
        .unwrap();

    assert!(db.delete_folder("folder-1").unwrap());
    assert!(db.get_folder("folder-1").unwrap().is_none());
    assert!(db.get_folder_by_slug("favourites-1234").unwrap().is_none());
    assert!(db.get_user_folders("user-1").unwrap().is_empty());
    assert!(!db.delete_folder("folder-1").unwrap());
}

#[test]
fn test_purge_all() {
    let (_dir, db) = test_db();
    db.put_comic(&sample_comic("comic-1", "user-1")).unwrap();
    db.put_chapter(&sample_chapter("ch-1", "comic-1", 1)).unwrap();
    db.put_user(&sample_user("user-1", "artist", "a@example.com"))
        .unwrap();
    db.put_folder(&sample_folder("folder-1", "user-1", "fav-1"))
        .unwrap();

    let stats = db.purge_all().unwrap();
    assert_eq!(stats.comics, 1);
    assert_eq!(stats.chapters, 1);
    assert_eq!(stats.users, 1);
    assert_eq!(stats.folders, 1);

    assert!(db.get_comic("comic-1").unwrap().is_none());
    assert!(db.list_comics_by_creator("user-1").unwrap().is_empty());
    assert!(!db.username_exists("artist").unwrap());
    assert!(db.get_folder_by_slug("fav-1").unwrap().is_none());
}

#[test]
fn test_reopen_persists_data() {
    let dir = tempfile::tempdir().unwrap();
    {
        let db = Database::open(dir.path().join("data")).unwrap();
        db.put_comic(&sample_comic("comic-1", "user-1")).unwrap();
    }
    let db = Database::open(dir.path().join("data")).unwrap();
    assert!(db.get_comic("comic-1").unwrap().is_some());
}
