use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions of containers lofty can read tags from.
const AUDIO_EXTENSIONS: &[&str] = &[
    "aac", "aif", "aiff", "ape", "flac", "m4a", "m4b", "m4p", "mp3", "mp4", "mpc", "oga", "ogg",
    "opus", "spx", "wav", "wv",
];

/// Whether the path has an audio extension (case-insensitive).
pub fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand a command-line input into the audio files it names.
///
/// Files are returned as given, whatever their extension. Directories are
/// scanned for audio files, descending into subdirectories only when
/// `recursive` is set. Results from a directory are sorted by path.
pub fn collect_audio_files(input: &Path, recursive: bool) -> Vec<PathBuf> {
    if !input.is_dir() {
        return vec![input.to_path_buf()];
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(target: "scanner", error = %err, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_audio_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    tracing::debug!(target: "scanner", root = %input.display(), count = files.len(), "Scanned directory");
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("song.mp3")));
        assert!(is_audio_file(Path::new("UPPERCASE.M4A")));
        assert!(is_audio_file(Path::new("/music/a.flac")));
        assert!(!is_audio_file(Path::new("notes.txt")));
        assert!(!is_audio_file(Path::new("cover.jpg")));
        assert!(!is_audio_file(Path::new("no_extension")));
    }

    #[test]
    fn test_collect_audio_files() {
        let dir = tempdir().unwrap();
        let root = dir.path();

        // Create dummy files in root
        File::create(root.join("song.mp3")).unwrap();
        File::create(root.join("music.m4a")).unwrap();
        File::create(root.join("notes.txt")).unwrap(); // Should be ignored
        File::create(root.join("image.png")).unwrap(); // Should be ignored
        File::create(root.join("UPPERCASE.OGG")).unwrap(); // Should be found (case-insensitive)

        // Create subdirectory
        let subdir = root.join("subdir");
        std::fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("track.wav")).unwrap();
        File::create(subdir.join("ignore.doc")).unwrap(); // Should be ignored

        let shallow = collect_audio_files(root, false);
        assert_eq!(shallow.len(), 3);
        assert!(!shallow.contains(&subdir.join("track.wav")));

        let deep = collect_audio_files(root, true);
        assert_eq!(deep.len(), 4);
        assert!(deep.contains(&subdir.join("track.wav")));

        // Sorted
        let mut sorted = deep.clone();
        sorted.sort();
        assert_eq!(deep, sorted);
    }

    #[test]
    fn test_explicit_file_kept_as_is() {
        let files = collect_audio_files(Path::new("whatever.bin"), true);
        assert_eq!(files, vec![PathBuf::from("whatever.bin")]);
    }
}
