//! Roaring bitmap containers.

use roaring::{RoaringBitmap, RoaringTreemap};

use super::Provider;

/// Compressed bitmap over 32-bit identifiers.
pub type Bitmap32 = RoaringBitmap;

/// Compressed bitmap over 64-bit identifiers.
pub type Bitmap64 = RoaringTreemap;

impl Provider<u32> for RoaringBitmap {
    fn insert(&mut self, value: u32) -> bool {
        RoaringBitmap::insert(self, value)
    }

    fn remove(&mut self, value: u32) -> bool {
        RoaringBitmap::remove(self, value)
    }

    fn or(&mut self, other: &Self) {
        *self |= other;
    }

    fn and(&mut self, other: &Self) {
        *self &= other;
    }

    fn xor(&mut self, other: &Self) {
        *self ^= other;
    }

    fn contains(&self, value: u32) -> bool {
        RoaringBitmap::contains(self, value)
    }

    fn cardinality(&self) -> u64 {
        self.len()
    }

    fn each<F: FnMut(u32) -> bool>(&self, mut delegate: F) {
        for value in self.iter() {
            if !delegate(value) {
                break;
            }
        }
    }

    fn slice(&self) -> Vec<u32> {
        self.iter().collect()
    }

    fn clear(&mut self) {
        RoaringBitmap::clear(self)
    }

    fn is_empty(&self) -> bool {
        RoaringBitmap::is_empty(self)
    }
}

impl Provider<u64> for RoaringTreemap {
    fn insert(&mut self, value: u64) -> bool {
        RoaringTreemap::insert(self, value)
    }

    fn remove(&mut self, value: u64) -> bool {
        RoaringTreemap::remove(self, value)
    }

    fn or(&mut self, other: &Self) {
        *self |= other;
    }

    fn and(&mut self, other: &Self) {
        *self &= other;
    }

    fn xor(&mut self, other: &Self) {
        *self ^= other;
    }

    fn contains(&self, value: u64) -> bool {
        RoaringTreemap::contains(self, value)
    }

    fn cardinality(&self) -> u64 {
        self.len()
    }

    fn each<F: FnMut(u64) -> bool>(&self, mut delegate: F) {
        for value in self.iter() {
            if !delegate(value) {
                break;
            }
        }
    }

    fn slice(&self) -> Vec<u64> {
        self.iter().collect()
    }

    fn clear(&mut self) {
        RoaringTreemap::clear(self)
    }

    fn is_empty(&self) -> bool {
        RoaringTreemap::is_empty(self)
    }
}
