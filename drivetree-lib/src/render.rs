// --- FILE: drivetree-lib/src/render.rs ---

use std::cmp::Ordering;
use std::fmt;

use crate::record::{FileKind, FileRecord};
use crate::tree::Forest;

/// Default maximum number of characters of a name shown on one line.
pub const DEFAULT_NAME_WIDTH: usize = 40;

const INDENT_MARKER: &str = "  | ";

/// How names compare within one kind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameOrder {
    /// Plain code point order: every uppercase letter sorts before `a`.
    #[default]
    CodePoint,
    /// Lowercased comparison, falling back to code point order on ties.
    CaseInsensitive,
}

/// Display settings for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Names longer than this are cut; shorter ones are padded to it.
    pub name_width: usize,
    pub name_order: NameOrder,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            name_width: DEFAULT_NAME_WIDTH,
            name_order: NameOrder::default(),
        }
    }
}

/// One visited node of the forest.
///
/// `Display` produces the formatted tree line; the fields stay available for
/// callers that want to lay things out differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeLine<'a> {
    pub depth: usize,
    pub kind: FileKind,
    pub name: &'a str,
    pub id: &'a str,
    name_width: usize,
}

impl fmt::Display for TreeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.name.chars().take(self.name_width).collect();
        write!(
            f,
            "{}{} {:<8} {:<width$} (ID: {})",
            INDENT_MARKER.repeat(self.depth),
            self.kind.glyph(),
            self.kind.label(),
            shown,
            self.id,
            width = self.name_width,
        )
    }
}

/// Lazy pre-order walk over a [`Forest`], created by [`render`].
///
/// Siblings are visited folders first, then by name. Calling [`render`] again
/// on the same forest yields the same sequence.
pub struct Lines<'a> {
    forest: &'a Forest,
    options: RenderOptions,
    /// Pending `(record index, depth)` pairs; the next one to emit is on top.
    stack: Vec<(usize, usize)>,
}

/// Renders `forest` as a sequence of display lines, one per reachable record.
pub fn render(forest: &Forest, options: RenderOptions) -> Lines<'_> {
    let mut lines = Lines {
        forest,
        options,
        stack: Vec::with_capacity(forest.root_count()),
    };
    lines.push_sorted(forest.root_indices(), 0);
    lines
}

impl<'a> Lines<'a> {
    fn push_sorted(&mut self, indices: &[usize], depth: usize) {
        let forest = self.forest;
        let order = self.options.name_order;
        let mut ordered = indices.to_vec();
        ordered.sort_by(|&a, &b| sibling_order(forest.record(a), forest.record(b), order));
        // Reversed so the first sibling is popped first.
        self.stack
            .extend(ordered.into_iter().rev().map(|index| (index, depth)));
    }
}

/// Folders before regular files, then by name.
fn sibling_order(a: &FileRecord, b: &FileRecord, order: NameOrder) -> Ordering {
    let by_kind = (!a.is_folder()).cmp(&!b.is_folder());
    by_kind.then_with(|| match order {
        NameOrder::CodePoint => a.name.cmp(&b.name),
        NameOrder::CaseInsensitive => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    })
}

impl<'a> Iterator for Lines<'a> {
    type Item = TreeLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, depth) = self.stack.pop()?;
        let forest = self.forest;
        let record = forest.record(index);
        if record.is_folder() {
            self.push_sorted(forest.child_indices(index), depth + 1);
        }
        Some(TreeLine {
            depth,
            kind: record.kind,
            name: &record.name,
            id: &record.id,
            name_width: self.options.name_width,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_forest;

    fn names(forest: &Forest) -> Vec<(usize, String)> {
        render(forest, RenderOptions::default())
            .map(|line| (line.depth, line.name.to_string()))
            .collect()
    }

    #[test]
    fn empty_forest_renders_nothing() {
        let forest = build_forest(Vec::new());
        assert_eq!(render(&forest, RenderOptions::default()).count(), 0);
    }

    #[test]
    fn docs_report_photos_scenario() {
        let forest = build_forest(vec![
            FileRecord::folder("1", "Docs", &[]),
            FileRecord::file("2", "report.txt", &["1"]),
            FileRecord::folder("3", "Photos", &[]),
        ]);
        let lines: Vec<_> = render(&forest, RenderOptions::default()).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!((lines[0].kind, lines[0].name, lines[0].depth), (FileKind::Folder, "Docs", 0));
        assert_eq!(
            (lines[1].kind, lines[1].name, lines[1].depth),
            (FileKind::RegularFile, "report.txt", 1)
        );
        assert_eq!((lines[2].kind, lines[2].name, lines[2].depth), (FileKind::Folder, "Photos", 0));
    }

    #[test]
    fn folders_come_before_files() {
        let forest = build_forest(vec![
            FileRecord::file("a", "a", &[]),
            FileRecord::folder("b", "B", &[]),
        ]);
        assert_eq!(names(&forest), vec![(0, "B".into()), (0, "a".into())]);
    }

    #[test]
    fn same_kind_siblings_sort_by_code_point() {
        let forest = build_forest(vec![
            FileRecord::folder("p", "Parent", &[]),
            FileRecord::file("3", "banana", &["p"]),
            FileRecord::file("1", "Cherry", &["p"]),
            FileRecord::file("2", "Apple", &["p"]),
        ]);
        assert_eq!(
            names(&forest),
            vec![
                (0, "Parent".into()),
                (1, "Apple".into()),
                (1, "Cherry".into()),
                (1, "banana".into()),
            ]
        );
    }

    #[test]
    fn case_insensitive_order_interleaves_cases() {
        let forest = build_forest(vec![
            FileRecord::file("3", "banana", &[]),
            FileRecord::file("1", "Cherry", &[]),
            FileRecord::file("2", "Apple", &[]),
        ]);
        let options = RenderOptions {
            name_order: NameOrder::CaseInsensitive,
            ..RenderOptions::default()
        };
        let order: Vec<&str> = render(&forest, options).map(|l| l.name).collect();
        assert_eq!(order, vec!["Apple", "banana", "Cherry"]);
    }

    #[test]
    fn nested_folders_sort_at_every_level() {
        let forest = build_forest(vec![
            FileRecord::file("z", "z.txt", &["top"]),
            FileRecord::folder("inner", "Inner", &["top"]),
            FileRecord::file("deep", "deep.txt", &["inner"]),
            FileRecord::folder("top", "Top", &[]),
        ]);
        assert_eq!(
            names(&forest),
            vec![
                (0, "Top".into()),
                (1, "Inner".into()),
                (2, "deep.txt".into()),
                (1, "z.txt".into()),
            ]
        );
    }

    #[test]
    fn line_count_matches_record_count() {
        let records = vec![
            FileRecord::folder("r", "Root", &[]),
            FileRecord::folder("s", "Sub", &["r"]),
            FileRecord::file("f1", "one", &["s"]),
            FileRecord::file("f2", "two", &["r", "s"]),
            FileRecord::file("f3", "three", &["elsewhere"]),
            FileRecord::file("f4", "four", &["f3"]),
        ];
        let total = records.len();
        let forest = build_forest(records);
        assert_eq!(render(&forest, RenderOptions::default()).count(), total);
    }

    #[test]
    fn rendering_twice_is_identical() {
        let forest = build_forest(vec![
            FileRecord::folder("1", "Docs", &[]),
            FileRecord::file("2", "b.txt", &["1"]),
            FileRecord::file("3", "a.txt", &["1"]),
        ]);
        let first: Vec<String> = render(&forest, RenderOptions::default())
            .map(|l| l.to_string())
            .collect();
        let second: Vec<String> = render(&forest, RenderOptions::default())
            .map(|l| l.to_string())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn line_format_matches_listing_layout() {
        let forest = build_forest(vec![
            FileRecord::folder("1", "Docs", &[]),
            FileRecord::file("2", "report.txt", &["1"]),
        ]);
        let lines: Vec<String> = render(&forest, RenderOptions::default())
            .map(|l| l.to_string())
            .collect();
        assert_eq!(lines[0], format!("📂 [Folder] {:<40} (ID: 1)", "Docs"));
        assert_eq!(lines[1], format!("  | 📄 [File]   {:<40} (ID: 2)", "report.txt"));
    }

    #[test]
    fn long_names_are_truncated_for_display_only() {
        let long_name = "x".repeat(55);
        let forest = build_forest(vec![FileRecord::file("id", long_name.clone(), &[])]);
        let options = RenderOptions {
            name_width: 10,
            ..RenderOptions::default()
        };
        let line = render(&forest, options).next().expect("one line");
        assert_eq!(line.to_string(), "📄 [File]   xxxxxxxxxx (ID: id)");
        assert_eq!(line.name, long_name);
        assert_eq!(forest.roots().next().map(|r| r.name.len()), Some(55));
    }

    #[test]
    fn children_of_regular_files_are_never_visited() {
        // Parent resolution only accepts folders, so a file never has children.
        let forest = build_forest(vec![
            FileRecord::file("f", "file", &[]),
            FileRecord::file("g", "other", &["f"]),
        ]);
        assert_eq!(names(&forest), vec![(0, "file".into()), (0, "other".into())]);
    }
}
