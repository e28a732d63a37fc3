//! CFI Generator
//!
//! Builds CFIs from document positions: a builder for programmatic
//! construction, the base component of a spine section, and range assembly
//! with the shared prefix hoisted into the path.

use super::types::*;

/// Index of the `<spine>` element among the package document's children
/// (metadata, manifest, spine), which yields the usual `/6` first step.
pub const DEFAULT_SPINE_NODE_INDEX: usize = 2;

/// Builder for constructing CFIs programmatically
///
/// Steps go into the base component until [`CfiBuilder::indirection`] is
/// called, and into the path afterwards.
#[derive(Debug, Clone, Default)]
pub struct CfiBuilder {
    base: Segment,
    path: Segment,
    indirected: bool,
}

impl CfiBuilder {
    /// Create a new CFI builder
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&mut self) -> &mut Segment {
        if self.indirected {
            &mut self.path
        } else {
            &mut self.base
        }
    }

    /// Add the step to the spine element of the package document (`/6`)
    pub fn package_step(mut self) -> Self {
        self.base.push(Step::element(DEFAULT_SPINE_NODE_INDEX));
        self
    }

    /// Add a spine item step: index 0 -> /2, index 1 -> /4, etc.
    pub fn spine_item(mut self, index: usize) -> Self {
        self.base.push(Step::element(index));
        self
    }

    /// Add a spine item step with the itemref's ID assertion
    pub fn spine_item_with_id(mut self, index: usize, id: impl Into<String>) -> Self {
        self.base.push(Step::element_with_id(index, id));
        self
    }

    /// Switch from the package document to the content document
    pub fn indirection(mut self) -> Self {
        self.indirected = true;
        self
    }

    /// Add an element step: index 0 -> /2, index 1 -> /4, etc.
    pub fn element(mut self, index: usize) -> Self {
        self.current().push(Step::element(index));
        self
    }

    /// Add an element step with ID assertion
    pub fn element_with_id(mut self, index: usize, id: impl Into<String>) -> Self {
        self.current().push(Step::element_with_id(index, id));
        self
    }

    /// Add a text node step: first text -> /1, second text -> /3, etc.
    pub fn text_node(mut self, index: usize) -> Self {
        self.current().push(Step::text(index));
        self
    }

    /// Set the character offset within a text node
    pub fn character_offset(mut self, offset: usize) -> Self {
        self.current().terminal.offset = Some(offset);
        self
    }

    /// Set the character offset with a text location assertion
    pub fn character_offset_with_assertion(
        mut self,
        offset: usize,
        assertion: impl Into<String>,
    ) -> Self {
        self.current().terminal = Terminal {
            offset: Some(offset),
            assertion: Some(assertion.into()),
        };
        self
    }

    /// Build the final CFI
    pub fn build(self) -> Cfi {
        Cfi::new(self.base, self.path)
    }

    /// Get the current content path
    pub fn path(&self) -> &Segment {
        &self.path
    }
}

/// Base component for a spine section: `/6/4[idref]` for section 1.
///
/// `spine_node_index` is the position of `<spine>` inside `<package>`,
/// `pos` the section's position in the spine.
pub fn chapter_component(spine_node_index: usize, pos: usize, id: Option<&str>) -> Segment {
    let spine = Step::element(spine_node_index);
    let item = match id {
        Some(id) => Step::element_with_id(pos, id),
        None => Step::element(pos),
    };
    Segment::with_steps(vec![spine, item])
}

/// Assemble a range from two absolute segments.
///
/// Steps shared by `start` and `end` move into the path. If both ends turn
/// out to be the same point the result is a point CFI.
pub fn hoist_common(base: Segment, mut start: Segment, mut end: Segment) -> Cfi {
    let len = start.steps.len();
    let mut common = 0;
    let mut same_point = false;

    for i in 0..len {
        if end.steps.get(i) != Some(&start.steps[i]) {
            break;
        }
        if i == len - 1 {
            // Last step is shared: only a point if the terminals match too
            if start.terminal == end.terminal && end.steps.len() == len {
                common += 1;
                same_point = true;
            }
        } else {
            common += 1;
        }
    }

    if same_point {
        return Cfi::new(base, start);
    }

    let shared: Vec<Step> = start.steps.drain(..common).collect();
    end.steps.drain(..common);

    Cfi::with_range(base, Segment::with_steps(shared), CfiRange { start, end })
}

/// Generate a CFI for a position in a spine item
///
/// # Arguments
/// * `spine_index` - 0-based index of the spine item
/// * `element_path` - Element indices from the document element down
/// * `text_node_index` - Index of the text node within the final element (0-based)
/// * `char_offset` - Character offset within the text node
///
/// # Example
/// ```ignore
/// // Character 42 in the first text of the first paragraph of <body>, chapter 2
/// let cfi = generate_cfi(1, &[1, 0], 0, 42);
/// // Returns: epubcfi(/6/4!/4/2/1:42)
/// ```
pub fn generate_cfi(
    spine_index: usize,
    element_path: &[usize],
    text_node_index: usize,
    char_offset: usize,
) -> Cfi {
    let mut builder = CfiBuilder::new()
        .package_step()
        .spine_item(spine_index)
        .indirection();

    for &idx in element_path {
        builder = builder.element(idx);
    }

    builder
        .text_node(text_node_index)
        .character_offset(char_offset)
        .build()
}

/// Generate a CFI range for a text selection
///
/// # Arguments
/// * `spine_index` - 0-based index of the spine item
/// * `start_path` - Element path to the start of the selection
/// * `start_text_index` - Text node index at the start
/// * `start_offset` - Character offset at the start
/// * `end_path` - Element path to the end of the selection
/// * `end_text_index` - Text node index at the end
/// * `end_offset` - Character offset at the end
pub fn generate_cfi_range(
    spine_index: usize,
    start_path: &[usize],
    start_text_index: usize,
    start_offset: usize,
    end_path: &[usize],
    end_text_index: usize,
    end_offset: usize,
) -> Cfi {
    let start = generate_cfi(spine_index, start_path, start_text_index, start_offset);
    let end = generate_cfi(spine_index, end_path, end_text_index, end_offset);
    hoist_common(start.base, start.path, end.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfi_builder_simple() {
        let cfi = CfiBuilder::new()
            .package_step()
            .spine_item(1) // Second spine item -> /4
            .indirection()
            .element(1) // body -> /4
            .element(0) // first child -> /2
            .text_node(0) // first text -> /1
            .character_offset(42)
            .build();

        assert_eq!(cfi.to_string(), "epubcfi(/6/4!/4/2/1:42)");
    }

    #[test]
    fn test_cfi_builder_with_id() {
        let cfi = CfiBuilder::new()
            .package_step()
            .spine_item_with_id(0, "chapter1")
            .indirection()
            .element(1)
            .build();

        assert_eq!(cfi.to_string(), "epubcfi(/6/2[chapter1]!/4)");
    }

    #[test]
    fn test_builder_with_assertion() {
        let cfi = CfiBuilder::new()
            .package_step()
            .spine_item(0)
            .indirection()
            .element(1)
            .text_node(0)
            .character_offset_with_assertion(3, "yes")
            .build();

        assert_eq!(cfi.to_string(), "epubcfi(/6/2!/4/1:3[yes])");
    }

    #[test]
    fn test_chapter_component() {
        let base = chapter_component(DEFAULT_SPINE_NODE_INDEX, 1, Some("chap01ref"));
        assert_eq!(base.to_string(), "/6/4[chap01ref]");

        let base = chapter_component(3, 0, None);
        assert_eq!(base.to_string(), "/8/2");
    }

    #[test]
    fn test_generate_cfi() {
        let cfi = generate_cfi(0, &[1, 0, 1], 0, 100);
        assert_eq!(cfi.to_string(), "epubcfi(/6/2!/4/2/4/1:100)");
    }

    #[test]
    fn test_generate_cfi_range() {
        let cfi = generate_cfi_range(0, &[1, 0], 0, 10, &[1, 1], 0, 20);

        assert!(cfi.is_range());
        assert_eq!(cfi.to_string(), "epubcfi(/6/2!/4,/2/1:10,/4/1:20)");
    }

    #[test]
    fn test_range_in_one_text_node() {
        let cfi = generate_cfi_range(0, &[1, 0], 0, 10, &[1, 0], 0, 20);
        assert_eq!(cfi.to_string(), "epubcfi(/6/2!/4/2,/1:10,/1:20)");
    }

    #[test]
    fn test_same_point_is_not_a_range() {
        let cfi = generate_cfi_range(2, &[1, 0], 0, 7, &[1, 0], 0, 7);
        assert!(!cfi.is_range());
        assert_eq!(cfi.to_string(), "epubcfi(/6/6!/4/2/1:7)");
    }

    #[test]
    fn test_spine_index_conversion() {
        // Spine index 0 should become /2 in CFI
        let cfi = CfiBuilder::new().package_step().spine_item(0).build();
        assert_eq!(cfi.base.to_string(), "/6/2");

        // Spine index 4 should become /10 in CFI
        let cfi = CfiBuilder::new().package_step().spine_item(4).build();
        assert_eq!(cfi.base.to_string(), "/6/10");
        assert_eq!(cfi.spine_pos(), 4);
    }
}
