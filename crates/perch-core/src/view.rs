pub type ViewId = u64;

/// What a node is. Plain data: callbacks live on the retained widgets
/// (`perch_ui::lazy::LazyList` and friends), not in the tree.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewKind {
    Box,
    Column,
    /// Fixed-height filler standing in for rows outside the visible window.
    Spacer {
        height: f32,
    },
    Text {
        text: String,
    },
    ScrollV {
        offset: f32,
        viewport_height: f32,
        content_height: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub children: Vec<View>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            children: vec![],
        }
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn child(mut self, kid: View) -> Self {
        self.children.push(kid);
        self
    }
    pub fn id(mut self, id: ViewId) -> Self {
        self.id = id;
        self
    }
}
