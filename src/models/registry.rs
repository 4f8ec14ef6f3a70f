//! PlayerRegistry: players ordered by name in an unbalanced binary search tree.
//!
//! Tree shape is a direct function of insertion order. Nothing is rebalanced, so a sorted
//! insertion sequence degrades to a list (depth O(n)); see [`PlayerRegistry::height`].

use crate::logic::validation::is_valid_name;
use crate::models::player::{PlayerEntity, PlayerRecord};
use std::cmp::Ordering;

/// Errors that can occur during registry operations. None of them leaves the tree modified.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegistryError {
    /// Name does not satisfy the naming rule.
    InvalidName(String),
    /// A player with this name already exists (insert).
    DuplicateKey(String),
    /// Rename target is already taken by another player.
    NameConflict(String),
    /// No player with this name.
    NotFound(String),
    /// Category is not one of the configured categories.
    UnknownCategory(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::InvalidName(name) => write!(
                f,
                "Invalid name '{}': use 2-30 letters, digits, spaces or underscores",
                name
            ),
            RegistryError::DuplicateKey(name) => write!(f, "Player '{}' already exists", name),
            RegistryError::NameConflict(name) => write!(f, "Name '{}' is already in use", name),
            RegistryError::NotFound(name) => write!(f, "Player '{}' not found", name),
            RegistryError::UnknownCategory(category) => {
                write!(f, "Unknown category '{}'", category)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

type Link = Option<Box<Node>>;

#[derive(Clone, Debug)]
struct Node {
    key: String,
    value: PlayerRecord,
    left: Link,
    right: Link,
}

impl Node {
    fn new(value: PlayerRecord) -> Self {
        Self {
            key: value.name().to_string(),
            value,
            left: None,
            right: None,
        }
    }
}

/// Ordered store of players keyed by exact, case-sensitive name.
#[derive(Clone, Debug)]
pub struct PlayerRegistry {
    root: Link,
    len: usize,
    /// Categories every new record is seeded with.
    categories: Vec<String>,
}

impl PlayerRegistry {
    /// Empty registry for the given category set.
    pub fn new<S: AsRef<str>>(categories: &[S]) -> Self {
        Self {
            root: None,
            len: 0,
            categories: categories.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    pub fn height(&self) -> usize {
        fn depth(link: &Link) -> usize {
            match link {
                None => 0,
                Some(node) => 1 + depth(&node.left).max(depth(&node.right)),
            }
        }
        depth(&self.root)
    }

    /// Insert a record under its name. Fails with `DuplicateKey` if the name is taken.
    pub fn create(&mut self, record: PlayerRecord) -> Result<&PlayerRecord, RegistryError> {
        let inserted = insert(&mut self.root, record)?;
        self.len += 1;
        log::debug!("Registered player '{}' ({})", inserted.name(), inserted.id());
        Ok(inserted)
    }

    /// Look up a player by exact name.
    pub fn read(&self, name: &str) -> Option<&PlayerRecord> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            match name.cmp(n.key.as_str()) {
                Ordering::Equal => return Some(&n.value),
                Ordering::Less => node = n.left.as_deref(),
                Ordering::Greater => node = n.right.as_deref(),
            }
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read(name).is_some()
    }

    /// Apply `mutator` to the stored record in place. Returns false if `name` is absent.
    ///
    /// The key cannot change here: a record's name has no public setter. Use [`Self::rename`].
    /// Nor can the category set grow: `update_score` ignores categories the record does not track.
    pub fn update<F>(&mut self, name: &str, mutator: F) -> bool
    where
        F: FnOnce(&mut PlayerRecord),
    {
        match self.find_mut(name) {
            Some(record) => {
                mutator(record);
                true
            }
            None => false,
        }
    }

    /// Remove a player. Returns whether a node was removed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.remove(name).is_some()
    }

    /// Remove a player and hand back its record.
    ///
    /// A node with two children is replaced by its in-order successor (leftmost node of the
    /// right subtree), which is spliced out of that subtree.
    pub fn remove(&mut self, name: &str) -> Option<PlayerRecord> {
        let node = remove_node(&mut self.root, name)?;
        self.len -= 1;
        log::debug!("Removed player '{}'", node.key);
        Some(node.value)
    }

    /// Records in ascending name order. Does not touch the tree, so it can be called repeatedly.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.root)
    }

    /// Materialized in-order traversal.
    pub fn inorder(&self) -> Vec<&PlayerRecord> {
        self.iter().collect()
    }

    /// Validate `name` and register a new player with zeroed stats for every category.
    pub fn create_player(&mut self, name: &str) -> Result<&PlayerRecord, RegistryError> {
        let name = name.trim();
        if !is_valid_name(name) {
            return Err(RegistryError::InvalidName(name.to_string()));
        }
        let record = PlayerRecord::new(name, &self.categories);
        self.create(record)
    }

    /// Re-key a player under `new_name`, keeping its id and stats.
    ///
    /// Both names are trimmed like in [`Self::create_player`]. All checks run before the old
    /// node is detached, so a failed rename changes nothing.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), RegistryError> {
        let old_name = old_name.trim();
        let new_name = new_name.trim();
        if !is_valid_name(new_name) {
            return Err(RegistryError::InvalidName(new_name.to_string()));
        }
        if !self.contains(old_name) {
            return Err(RegistryError::NotFound(old_name.to_string()));
        }
        if old_name == new_name {
            return Ok(());
        }
        if self.contains(new_name) {
            return Err(RegistryError::NameConflict(new_name.to_string()));
        }

        let mut record = self
            .remove(old_name)
            .ok_or_else(|| RegistryError::NotFound(old_name.to_string()))?;
        record.set_name(new_name.to_string());
        self.create(record)?;
        log::debug!("Renamed player '{}' to '{}'", old_name, new_name);
        Ok(())
    }

    /// Record one answered question for `name`.
    pub fn record_answer(
        &mut self,
        name: &str,
        category: &str,
        correct: bool,
    ) -> Result<(), RegistryError> {
        if !self.categories.iter().any(|c| c == category) {
            return Err(RegistryError::UnknownCategory(category.to_string()));
        }
        let mut tracked = false;
        if !self.update(name, |p| tracked = p.update_score(category, correct)) {
            return Err(RegistryError::NotFound(name.to_string()));
        }
        if !tracked {
            return Err(RegistryError::UnknownCategory(category.to_string()));
        }
        Ok(())
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut PlayerRecord> {
        let mut node = self.root.as_deref_mut();
        while let Some(n) = node {
            match name.cmp(n.key.as_str()) {
                Ordering::Equal => return Some(&mut n.value),
                Ordering::Less => node = n.left.as_deref_mut(),
                Ordering::Greater => node = n.right.as_deref_mut(),
            }
        }
        None
    }
}

fn insert(link: &mut Link, record: PlayerRecord) -> Result<&PlayerRecord, RegistryError> {
    match link {
        Some(node) => match record.name().cmp(node.key.as_str()) {
            Ordering::Less => insert(&mut node.left, record),
            Ordering::Greater => insert(&mut node.right, record),
            Ordering::Equal => Err(RegistryError::DuplicateKey(node.key.clone())),
        },
        None => Ok(&link.insert(Box::new(Node::new(record))).value),
    }
}

fn remove_node(link: &mut Link, key: &str) -> Option<Box<Node>> {
    let node = link.as_mut()?;
    match key.cmp(node.key.as_str()) {
        Ordering::Less => remove_node(&mut node.left, key),
        Ordering::Greater => remove_node(&mut node.right, key),
        Ordering::Equal => {
            let mut target = link.take()?;
            *link = match (target.left.take(), target.right.take()) {
                (None, None) => None,
                (Some(child), None) | (None, Some(child)) => Some(child),
                (Some(left), Some(right)) => {
                    let (mut successor, rest) = detach_leftmost(right);
                    successor.left = Some(left);
                    successor.right = rest;
                    Some(successor)
                }
            };
            Some(target)
        }
    }
}

/// Split off the leftmost node of `root`, returning it and what remains of the subtree.
fn detach_leftmost(mut root: Box<Node>) -> (Box<Node>, Link) {
    match root.left.take() {
        None => {
            let rest = root.right.take();
            (root, rest)
        }
        Some(left) => {
            let (min, rest) = detach_leftmost(left);
            root.left = rest;
            (min, Some(root))
        }
    }
}

/// In-order iterator over a [`PlayerRegistry`].
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn new(root: &'a Link) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left(root.as_deref());
        iter
    }

    fn push_left(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a PlayerRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(&node.value)
    }
}

impl<'a> IntoIterator for &'a PlayerRegistry {
    type Item = &'a PlayerRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
