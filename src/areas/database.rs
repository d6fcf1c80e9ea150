//! Content-addressed object store
//!
//! Objects are zlib-compressed and written once under their id. Writes go
//! through a temporary file followed by a rename, so a reader never sees a
//! partially written object.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::BitletError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store raw file content as a blob and return its id.
    pub fn put(&self, content: impl Into<Bytes>) -> anyhow::Result<ObjectId> {
        self.store(&Blob::new(content))
    }

    /// Raw content of the blob stored under `object_id`.
    pub fn get(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self.load_as::<Blob>(object_id, ObjectType::Blob)?;
        Ok(blob.into_content())
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Decompressed object bytes, header included.
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let path = self.object_path(object_id);
        let file = match std::fs::File::open(&path) {
            Ok(file) => file,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(BitletError::ObjectNotFound(object_id.to_string()).into());
            }
            Err(error) => {
                return Err(error).with_context(|| format!("Unable to open object {path:?}"));
            }
        };

        let mut content = Vec::new();
        ZlibDecoder::new(file)
            .read_to_end(&mut content)
            .with_context(|| format!("Unable to inflate object {object_id}"))?;

        Ok(content.into())
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        self.store_raw(&object_id, object.serialize()?)?;

        Ok(object_id)
    }

    /// Write already framed object bytes under `object_id`, unless present.
    /// The deflated bytes go to a temp file that is then renamed into place.
    pub fn store_raw(&self, object_id: &ObjectId, framed: Bytes) -> anyhow::Result<()> {
        if self.contains(object_id) {
            return Ok(());
        }

        let path = self.object_path(object_id);
        let fan_out = path
            .parent()
            .with_context(|| format!("Invalid object path {path:?}"))?;
        std::fs::create_dir_all(fan_out)
            .with_context(|| format!("Unable to create object directory {fan_out:?}"))?;

        let temp_path = fan_out.join(format!("tmp-obj-{}", rand::random::<u32>()));
        let file = std::fs::File::create(&temp_path)
            .with_context(|| format!("Unable to create {temp_path:?}"))?;
        let mut encoder = ZlibEncoder::new(file, Compression::default());
        encoder.write_all(&framed)?;
        encoder
            .finish()
            .with_context(|| format!("Unable to deflate object {object_id}"))?;

        tracing::trace!(oid = %object_id, "writing object");
        std::fs::rename(&temp_path, &path)
            .with_context(|| format!("Unable to move object into {path:?}"))
    }

    /// Any stored object, for display.
    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let mut reader = Cursor::new(self.load(object_id)?);

        Ok(match ObjectType::read_header(&mut reader)? {
            ObjectType::Blob => ObjectBox::Blob(Box::new(Blob::deserialize(reader)?)),
            ObjectType::Tree => ObjectBox::Tree(Box::new(Tree::deserialize(reader)?)),
            ObjectType::Commit => ObjectBox::Commit(Box::new(Commit::deserialize(reader)?)),
        })
    }

    /// Load a snapshot, failing with a typed error when it is absent or not a tree.
    pub fn load_tree(&self, object_id: &ObjectId) -> anyhow::Result<Tree> {
        self.load_as(object_id, ObjectType::Tree)
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.load_as(object_id, ObjectType::Commit)
    }

    fn load_as<T: Unpackable>(
        &self,
        object_id: &ObjectId,
        expected: ObjectType,
    ) -> anyhow::Result<T> {
        let mut reader = Cursor::new(self.load(object_id)?);
        let found = ObjectType::read_header(&mut reader)?;
        if found != expected {
            return Err(BitletError::Corrupt(format!(
                "object {object_id} is a {found}, expected a {expected}"
            ))
            .into());
        }

        T::deserialize(reader)
    }

    fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.to_path())
    }
}
