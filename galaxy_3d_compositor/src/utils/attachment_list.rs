/// Dense list with stable handles.
///
/// Materials keep the renderables attached to them in an `AttachmentList`.
/// Values are stored contiguously for iteration; removal swaps the last
/// value into the freed position and re-homes its handle, so a handle
/// always resolves to the current position of its value.

/// Stable handle returned by `AttachmentList::insert`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttachmentHandle(u32);

const FREE_POSITION: u32 = u32::MAX;

/// Dense storage with handle → position indirection
///
/// # Example
///
/// ```
/// use galaxy_3d_compositor::galaxy3d::{AttachmentList};
///
/// let mut list = AttachmentList::new();
/// let a = list.insert("a");
/// let b = list.insert("b");
/// list.remove(a);
/// assert_eq!(list.position(b), Some(0));
/// ```
pub struct AttachmentList<T> {
    /// Dense values with the handle that owns each position
    entries: Vec<(AttachmentHandle, T)>,
    /// Handle index → dense position (FREE_POSITION when unused)
    positions: Vec<u32>,
    /// Recycled handle indices (LIFO)
    free_handles: Vec<u32>,
}

impl<T> AttachmentList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: Vec::new(),
            free_handles: Vec::new(),
        }
    }

    /// Append a value and return its handle
    pub fn insert(&mut self, value: T) -> AttachmentHandle {
        let position = self.entries.len() as u32;
        let handle = match self.free_handles.pop() {
            Some(index) => {
                self.positions[index as usize] = position;
                AttachmentHandle(index)
            }
            None => {
                self.positions.push(position);
                AttachmentHandle(self.positions.len() as u32 - 1)
            }
        };
        self.entries.push((handle, value));
        handle
    }

    /// Swap-remove the value owned by `handle`
    ///
    /// The last value takes the freed position and its handle is updated.
    /// Returns None if the handle is not attached.
    pub fn remove(&mut self, handle: AttachmentHandle) -> Option<T> {
        let position = self.position(handle)?;
        let (_, value) = self.entries.swap_remove(position);
        if let Some((moved, _)) = self.entries.get(position) {
            self.positions[moved.0 as usize] = position as u32;
        }
        self.positions[handle.0 as usize] = FREE_POSITION;
        self.free_handles.push(handle.0);
        Some(value)
    }

    /// Current dense position of a handle
    pub fn position(&self, handle: AttachmentHandle) -> Option<usize> {
        match self.positions.get(handle.0 as usize) {
            Some(&position) if position != FREE_POSITION => Some(position as usize),
            _ => None,
        }
    }

    /// Whether the handle is attached
    pub fn contains(&self, handle: AttachmentHandle) -> bool {
        self.position(handle).is_some()
    }

    /// Value owned by a handle
    pub fn get(&self, handle: AttachmentHandle) -> Option<&T> {
        self.position(handle).map(|position| &self.entries[position].1)
    }

    /// Value stored at a dense position
    pub fn at(&self, position: usize) -> Option<&T> {
        self.entries.get(position).map(|(_, value)| value)
    }

    /// Iterate values in dense order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Iterate (handle, value) pairs in dense order
    pub fn iter_with_handles(&self) -> impl Iterator<Item = (AttachmentHandle, &T)> {
        self.entries.iter().map(|(handle, value)| (*handle, value))
    }

    /// Number of attached values
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is attached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detach everything; all handles become invalid
    pub fn clear(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.free_handles.clear();
    }
}

impl<T> Default for AttachmentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "attachment_list_tests.rs"]
mod tests;
