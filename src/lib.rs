extern crate bytes;
extern crate log;
extern crate seek_bufread;

mod chunks;
mod error;
pub mod ids;
pub mod reader;
mod stream;

#[cfg(test)]
mod fixtures;

pub use chunks::ChunkInfo;
pub use error::{Error, Result};
pub use reader::RiffReader;

#[cfg(test)]
mod test {
    use crate::{fixtures, ids, Error, RiffReader};
    use std::{fs, path::PathBuf};
    use tempfile::TempDir;

    fn sample_file(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("sample.snd");
        fs::write(&path, fixtures::wave()).unwrap();
        path
    }

    #[test]
    fn walk_sample_file() {
        let dir = TempDir::new().unwrap();
        let path = sample_file(&dir);

        let mut reader = RiffReader::open(&path, "WAVE").unwrap();
        assert_eq!(reader.depth(), 1);

        reader.find_chunk("fmt ").unwrap();
        assert_eq!(reader.depth(), 2);
        assert_eq!(reader.chunk_size(), 16);

        let mut format = [0; 16];
        assert_eq!(reader.read(&mut format).unwrap(), 16);
        assert_eq!(&format[..], &fixtures::pcm_format()[..]);
        let mut one = [0; 1];
        assert_eq!(reader.read(&mut one).unwrap(), 0);

        reader.ascend().unwrap();
        assert_eq!(reader.depth(), 1);

        reader.find_chunk("data").unwrap();
        let size = u64::from(reader.chunk_size());
        assert_eq!(reader.skip(size + 10).unwrap(), size);
        reader.ascend().unwrap();

        match reader.find_chunk("data") {
            Err(Error::NotFound { id }) => assert_eq!(&id.0, ids::DATA),
            r => panic!("unexpected {:?}", r),
        }
        assert_eq!(reader.depth(), 1);

        reader.close();
        assert!(!reader.is_open());
    }

    #[test]
    fn open_with_small_buffer() {
        let dir = TempDir::new().unwrap();
        let path = sample_file(&dir);

        let mut reader =
            RiffReader::open_with_capacity(&path, ids::WAVE, 8).unwrap();
        reader.find_list("INFO").unwrap();
        assert_eq!(reader.read_chunk("INAM").unwrap(), b"hi\0");
        reader.ascend().unwrap();
        assert_eq!(reader.read_chunk("data").unwrap(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn open_missing_file() {
        let dir = TempDir::new().unwrap();
        match RiffReader::open(dir.path().join("missing.wav"), "WAVE") {
            Err(Error::Open { path, .. }) => {
                assert!(path.ends_with("missing.wav"))
            }
            Err(e) => panic!("unexpected {:?}", e),
            Ok(_) => panic!("opened a file that does not exist"),
        }
    }

    #[test]
    fn open_wrong_form_type() {
        let dir = TempDir::new().unwrap();
        let path = sample_file(&dir);
        match RiffReader::open(&path, "AVI ") {
            Err(Error::FormNotFound { form_type }) => {
                assert_eq!(form_type.to_string(), "AVI ")
            }
            Err(e) => panic!("unexpected {:?}", e),
            Ok(_) => panic!("opened a WAVE file as AVI"),
        }
    }

    #[test]
    fn open_unreadable_path() {
        let dir = TempDir::new().unwrap();
        match RiffReader::open(dir.path(), "WAVE") {
            Err(e @ Error::Open { .. }) => assert!(e.is_open_failure()),
            Err(e) => panic!("unexpected {:?}", e),
            Ok(_) => panic!("opened a directory"),
        }
    }
}
