mod admin;
mod comics;
mod library;
mod static_files;
mod uploads;
mod users;

pub use admin::{admin_purge, approve_comic, health, list_pending, reject_comic};
pub use comics::{
    create_chapter, create_comic, delete_comic, get_chapter, get_comic, list_comics, my_comics,
    request_publish, update_comic, ComicResponse,
};
pub use library::{
    add_to_folder, add_to_library, create_folder, delete_folder, get_folder, get_library,
    get_public_folder, list_folders, remove_from_folder, remove_from_library,
};
pub use static_files::serve_object;
pub use uploads::upload_file;
pub use users::{become_creator, me, register, verify_credentials};
