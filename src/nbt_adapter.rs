//! Capability the decoder needs from an NBT tree, kept thin so the backend
//! (currently `named-binary-tag`) stays swappable (per design notes: the core
//! never mutates NBT and never names the backend type outside this module).

use nbt::CompoundTag;

/// Everything the world decoder ever asks of a compound tag.
pub trait NbtCompound {
    fn is_end(&self) -> bool;
    fn contains(&self, key: &str) -> bool;
    fn i8(&self, key: &str) -> Option<i8>;
    fn i32(&self, key: &str) -> Option<i32>;
    fn str(&self, key: &str) -> Option<&str>;
    fn compound(&self, key: &str) -> Option<&CompoundTag>;
    fn compound_list(&self, key: &str) -> Option<Vec<&CompoundTag>>;
    fn i64_list(&self, key: &str) -> Option<&[i64]>;
}

impl NbtCompound for CompoundTag {
    fn is_end(&self) -> bool {
        self.iter().next().is_none()
    }

    fn contains(&self, key: &str) -> bool {
        self.get_compound_tag(key).is_ok()
            || self.get_str(key).is_ok()
            || self.get_i32(key).is_ok()
            || self.get_i8(key).is_ok()
    }

    fn i8(&self, key: &str) -> Option<i8> {
        self.get_i8(key).ok()
    }

    fn i32(&self, key: &str) -> Option<i32> {
        self.get_i32(key).ok()
    }

    fn str(&self, key: &str) -> Option<&str> {
        self.get_str(key).ok()
    }

    fn compound(&self, key: &str) -> Option<&CompoundTag> {
        self.get_compound_tag(key).ok()
    }

    fn compound_list(&self, key: &str) -> Option<Vec<&CompoundTag>> {
        self.get_compound_tag_vec(key).ok()
    }

    fn i64_list(&self, key: &str) -> Option<&[i64]> {
        self.get_i64_vec(key).ok().map(|v| v.as_slice())
    }
}
