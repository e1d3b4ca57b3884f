//! An ordered map implemented with an AVL tree.
//!
//! [`AvlTreeMap`] keeps its entries sorted by key, either by the key type's
//! [`Ord`] implementation or by an injected [`Comparator`].
//! After every insertion and removal the height difference of the two
//! subtrees of any node is at most one, so the tree height stays within
//! about 1.44 log2(n) and all single-key operations run in O(log n).
//!
//! Operations that can fail return [`Result`] and leave the map unchanged
//! on error:
//!
//! ```
//! use avl_tree_map::{AvlTreeMap, Error};
//!
//! let mut map = AvlTreeMap::new();
//! for key in [22, 30, 15, 5, 17, 24, 33, 10, 16, 26] {
//!     map.insert(key, key * 10)?;
//! }
//! assert_eq!(map.len(), 10);
//! assert_eq!(map.insert(5, 0), Err(Error::DuplicateKey));
//! assert_eq!(map.remove(&42), Err(Error::KeyNotFound));
//!
//! let keys: Vec<_> = map.keys().copied().collect();
//! assert_eq!(keys, [5, 10, 15, 16, 17, 22, 24, 26, 30, 33]);
//! # Ok::<(), Error>(())
//! ```

mod compare;
mod error;
pub mod map;

pub use compare::{Comparator, Natural};
pub use error::{Error, Result};
pub use map::AvlTreeMap;
