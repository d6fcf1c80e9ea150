//! Blob object
//!
//! Blobs hold the raw bytes of one file version. Names live in snapshots.
//!
//! On disk: `blob <size>\0<content>`

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::BufRead;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    #[new(into)]
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn into_content(self) -> Bytes {
        self.content
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(frame(self.object_type(), &self.content))
    }
}

impl Unpackable for Blob {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;

        Ok(Self::new(content))
    }
}

impl Object for Blob {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blob
    }

    fn display(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_gets_identical_ids() {
        let a = Blob::new("same bytes");
        let b = Blob::new(b"same bytes".to_vec());

        assert_eq!(a.object_id().unwrap(), b.object_id().unwrap());
    }

    #[test]
    fn id_covers_the_header() {
        // sha1("blob 5\0hello"), the same id git gives this content
        let blob = Blob::new("hello");

        assert_eq!(
            blob.object_id().unwrap().as_ref(),
            "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0"
        );
    }

    #[test]
    fn binary_content_is_kept_verbatim() {
        let blob = Blob::new(vec![0u8, 159, 146, 150]);
        let packed = blob.serialize().unwrap();

        assert!(packed.ends_with(&[0u8, 159, 146, 150]));
    }
}
