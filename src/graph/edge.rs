/// Directed edge from an imported node to the file that imports it.
///
/// Repeated imports of the same module from the same file collapse onto one
/// edge and bump `count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportEdge {
    pub count: usize,
}

impl Default for ImportEdge {
    fn default() -> Self {
        Self { count: 1 }
    }
}
