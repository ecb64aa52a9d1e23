//! Demo data loaded into the entity store at startup.

use crate::{
    models::{
        DEMO_USER_ID,
        drive::{DriveKind, NewDrive},
        file::{FileKind, NewFile},
        upload::NewUpload,
        user::{NewUser, User},
    },
    services::{
        auth_service::{AuthError, hash_password},
        entity_store::{EntityStore, StoreError},
    },
};
use tracing::info;

pub const DEMO_EMAIL: &str = "demo@linkmydrives.com";
pub const DEMO_PASSWORD: &str = "demo123";

/// (name, kind, account email, total MB, used MB)
const DRIVES: &[(&str, DriveKind, &str, u64, u64)] = &[
    ("Google Drive", DriveKind::Google, "demo@gmail.com", 15360, 7372),
    ("OneDrive", DriveKind::OneDrive, "demo@outlook.com", 5120, 3891),
    ("Dropbox", DriveKind::Dropbox, "demo@email.com", 2048, 1536),
    ("iCloud", DriveKind::ICloud, "demo@icloud.com", 5120, 4301),
];

/// (drive id, name, path, kind, size KB, last modified)
const FILES: &[(u64, &str, &str, FileKind, u64, &str)] = &[
    (1, "Project Proposal.pdf", "/Projects/2023/Proposals/", FileKind::Pdf, 2457, "2023-05-15"),
    (2, "Product Mockup.png", "/Designs/Products/", FileKind::Image, 4915, "2023-05-12"),
    (3, "Product Demo.mp4", "/Videos/Demos/", FileKind::Video, 39117, "2023-05-10"),
    (2, "Meeting Notes.docx", "/Documents/Meetings/", FileKind::Doc, 1228, "2023-05-08"),
    (1, "Budget 2023.xlsx", "/Finance/2023/", FileKind::Spreadsheet, 3686, "2023-05-05"),
    (4, "Vacation Photos.zip", "/Archives/Photos/", FileKind::Archive, 45875, "2023-06-25"),
    (3, "Company Branding.ai", "/Design/Branding/", FileKind::Image, 15360, "2023-06-22"),
    (1, "Quarterly Report.pptx", "/Presentations/Quarterly/", FileKind::Presentation, 8192, "2023-07-05"),
    (2, "Background Music.mp3", "/Media/Audio/", FileKind::Audio, 5120, "2023-07-10"),
    (4, "System Backup.dmg", "/Backups/System/", FileKind::Other, 51200, "2023-07-15"),
    (3, "Conference Notes.txt", "/Notes/Conferences/", FileKind::Text, 128, "2023-07-20"),
    (1, "Project Timeline.pdf", "/Projects/Timeline/", FileKind::Pdf, 3072, "2023-07-28"),
];

/// (drive id, file name, size KB, upload seconds, type label)
const UPLOADS: &[(u64, &str, u64, f64, &str)] = &[
    (1, "document.pdf", 2048, 3.2, "pdf"),
    (1, "presentation.pptx", 15360, 5.1, "pptx"),
    (1, "photo.jpg", 25600, 8.5, "jpg"),
    (1, "video_clip.mp4", 40960, 12.3, "mp4"),
    (1, "backup.zip", 66560, 15.7, "zip"),
    (1, "design_assets.psd", 87040, 17.2, "psd"),
    (2, "notes.txt", 1024, 1.8, "txt"),
    (2, "report.docx", 15360, 6.9, "docx"),
    (2, "spreadsheet.xlsx", 25600, 10.3, "xlsx"),
    (2, "music.mp3", 40960, 13.8, "mp3"),
    (2, "software.exe", 66560, 19.1, "exe"),
    (2, "project_files.zip", 87040, 22.6, "zip"),
    (3, "invoice.pdf", 2048, 4.9, "pdf"),
    (3, "image.png", 15360, 8.7, "png"),
    (3, "contract.pdf", 25600, 12.1, "pdf"),
    (3, "recording.wav", 40960, 17.3, "wav"),
    (3, "archive.zip", 66560, 20.5, "zip"),
    (3, "movie.mp4", 87040, 24.1, "mp4"),
    (4, "screenshot.png", 2048, 2.4, "png"),
    (4, "calendar.ics", 10240, 5.5, "ics"),
    (4, "contacts.vcf", 20480, 7.2, "vcf"),
    (4, "presentation.keynote", 35840, 14.7, "keynote"),
    (4, "photolibrary.photoslibrary", 61440, 18.3, "photoslibrary"),
    (4, "movie.mov", 81920, 23.4, "mov"),
    (4, "family_photos.heic", 15360, 6.8, "heic"),
    (4, "book.epub", 5120, 3.9, "epub"),
    (4, "sketch_design.sketch", 30720, 11.2, "sketch"),
    (4, "backup.pkg", 43008, 16.7, "pkg"),
];

/// Create the demo account every deployment logs in with.
pub async fn demo_user(store: &EntityStore) -> Result<User, AuthError> {
    let user = store
        .create_user(NewUser {
            username: "demo".into(),
            email: DEMO_EMAIL.into(),
            password_hash: hash_password(DEMO_PASSWORD)?,
        })
        .await;
    Ok(user)
}

/// Populate drives, files and upload statistics for the demo user.
pub async fn demo_content(store: &EntityStore) -> Result<(), StoreError> {
    for &(name, kind, email, total_space, used_space) in DRIVES {
        store
            .create_drive(NewDrive {
                user_id: DEMO_USER_ID,
                name: name.into(),
                kind,
                email: email.into(),
                total_space,
                used_space,
                is_connected: Some(true),
            })
            .await?;
    }

    for &(drive_id, name, path, kind, size, last_modified) in FILES {
        store
            .create_file(NewFile {
                drive_id,
                user_id: DEMO_USER_ID,
                name: name.into(),
                path: path.into(),
                kind,
                size,
                last_modified: last_modified.into(),
            })
            .await;
    }

    for &(drive_id, file_name, file_size, upload_time, file_type) in UPLOADS {
        store
            .create_upload(NewUpload {
                user_id: DEMO_USER_ID,
                drive_id,
                // the demo uploads point at the first file of each drive
                file_id: drive_id,
                file_name: file_name.into(),
                file_size,
                upload_time,
                file_type: file_type.into(),
            })
            .await;
    }

    info!(
        drives = DRIVES.len(),
        files = FILES.len(),
        uploads = UPLOADS.len(),
        "seeded demo content"
    );
    Ok(())
}
