use std::cmp::Ordering;

use avl_tree_map::{AvlTreeMap, Error};

fn main() -> Result<(), Error> {
    let mut map = AvlTreeMap::new();
    map.insert(0, "zero")?;
    map.insert(1, "one")?;
    map.insert(2, "two")?;
    map.insert(3, "three")?;
    map.insert(4, "four")?;
    map.insert(5, "five")?;
    assert_eq!(map.insert(2, "two"), Err(Error::DuplicateKey));
    assert_eq!(map.get(&1), Some(&"one"));
    map.remove(&1)?;
    assert!(map.get(&1).is_none());
    assert_eq!(map.remove(&1), Err(Error::KeyNotFound));

    map.set(Some(6), "six")?;
    map.set(Some(0), "nil")?;
    assert_eq!(map.set(None, "none"), Err(Error::InvalidKey));

    println!("height {} for {} entries", map.height(), map.len());
    for (k, v) in &map {
        println!("{k} => {v}");
    }

    let descending = |lhs: &&str, rhs: &&str| -> Ordering { rhs.cmp(lhs) };
    let words = AvlTreeMap::try_from_entries_with(map.iter().map(|(k, v)| (*v, *k)), descending)?;
    print!("{{ ");
    for word in words.keys() {
        print!("{word}, ");
    }
    println!("}}");

    Ok(())
}
