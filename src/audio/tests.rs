use std::io::{Read, Seek, SeekFrom};

use super::source::StreamBytes;
use super::types::PlaybackInfo;

#[test]
fn stream_bytes_are_readable_and_seekable() {
    let bytes = StreamBytes::new(vec![1, 2, 3, 4, 5]);
    let mut cursor = std::io::Cursor::new(bytes.clone());

    let mut buf = [0u8; 2];
    cursor.read_exact(&mut buf).unwrap();
    assert_eq!(buf, [1, 2]);

    cursor.seek(SeekFrom::Start(3)).unwrap();
    let mut rest = Vec::new();
    cursor.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, vec![4, 5]);

    // The clone shares the same backing buffer.
    assert_eq!(bytes.len(), 5);
}

#[test]
fn playback_info_starts_idle() {
    let info = PlaybackInfo::default();
    assert!(!info.playing);
    assert_eq!(info.ended, 0);
    assert_eq!(info.total, None);
    assert_eq!(info.position, std::time::Duration::ZERO);
}
