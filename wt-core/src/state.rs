use crate::{
    action::TextEdit,
    config::NewConfig,
    git::Worktree,
    service::RepoContext,
};
use std::path::PathBuf;
use unicode_segmentation::UnicodeSegmentation;

/// Rows outside the list: two frame borders, title, column header, footer, status
pub const CHROME_ROWS: u16 = 6;

/// Minimum width of the branch column, the width of its "Branch" header
pub const MIN_BRANCH_COLUMN: usize = 6;

pub const SPINNER_FRAMES: &[&str] = &[
    "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
];

/// Single-line text with a byte cursor that always sits on a grapheme boundary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub text: String,
    pub cursor: usize,
}

fn is_whitespace(grapheme: &str) -> bool {
    grapheme.chars().all(char::is_whitespace)
}

impl TextInput {
    fn grapheme_boundaries(&self) -> Vec<usize> {
        let mut boundaries: Vec<usize> = self.text.grapheme_indices(true).map(|(i, _)| i).collect();
        boundaries.push(self.text.len());
        boundaries
    }

    fn clamp_cursor_to_boundary(&mut self, boundaries: &[usize]) -> usize {
        let cursor = self.cursor.min(self.text.len());
        let idx = match boundaries.binary_search(&cursor) {
            Ok(idx) => idx,
            Err(idx) => idx.saturating_sub(1),
        };
        self.cursor = boundaries.get(idx).copied().unwrap_or(0);
        idx
    }

    /// Start of the word before the cursor, skipping whitespace immediately before it
    fn prev_word_boundary(&self) -> usize {
        let before: Vec<(usize, &str)> = self.text[..self.cursor].grapheme_indices(true).collect();
        let mut idx = before.len();
        while idx > 0 && is_whitespace(before[idx - 1].1) {
            idx -= 1;
        }
        while idx > 0 && !is_whitespace(before[idx - 1].1) {
            idx -= 1;
        }
        before.get(idx).map_or(self.cursor, |(i, _)| *i)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn cursor_left(&mut self) {
        let boundaries = self.grapheme_boundaries();
        let idx = self.clamp_cursor_to_boundary(&boundaries);
        if idx > 0 {
            self.cursor = boundaries[idx - 1];
        }
    }

    pub fn cursor_right(&mut self) {
        let boundaries = self.grapheme_boundaries();
        let idx = self.clamp_cursor_to_boundary(&boundaries);
        if idx + 1 < boundaries.len() {
            self.cursor = boundaries[idx + 1];
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let boundaries = self.grapheme_boundaries();
        self.clamp_cursor_to_boundary(&boundaries);
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Remove the grapheme cluster before the cursor
    pub fn backspace(&mut self) -> bool {
        let boundaries = self.grapheme_boundaries();
        let idx = self.clamp_cursor_to_boundary(&boundaries);
        if idx == 0 {
            return false;
        }
        let prev = boundaries[idx - 1];
        self.text.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    /// Remove the grapheme cluster under the cursor
    pub fn delete_forward(&mut self) -> bool {
        let boundaries = self.grapheme_boundaries();
        let idx = self.clamp_cursor_to_boundary(&boundaries);
        if idx + 1 >= boundaries.len() {
            return false;
        }
        self.text.drain(self.cursor..boundaries[idx + 1]);
        true
    }

    pub fn delete_word(&mut self) -> bool {
        let boundaries = self.grapheme_boundaries();
        self.clamp_cursor_to_boundary(&boundaries);
        let start = self.prev_word_boundary();
        if start == self.cursor {
            return false;
        }
        self.text.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    /// Apply an edit; returns whether the text changed
    pub fn apply(&mut self, edit: TextEdit) -> bool {
        match edit {
            TextEdit::Insert(c) => {
                self.insert_char(c);
                true
            }
            TextEdit::Backspace => self.backspace(),
            TextEdit::Delete => self.delete_forward(),
            TextEdit::DeleteWord => self.delete_word(),
            TextEdit::Left => {
                self.cursor_left();
                false
            }
            TextEdit::Right => {
                self.cursor_right();
                false
            }
            TextEdit::Home => {
                self.cursor = 0;
                false
            }
            TextEdit::End => {
                self.cursor = self.text.len();
                false
            }
        }
    }
}

/// Anything shown in a [`SearchableList`]
pub trait ListItem {
    /// Text the filter matches against
    fn title(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterState {
    #[default]
    Unfiltered,
    /// Query being typed; keys go to the filter input
    Filtering,
    /// Query committed; shortcuts work on the narrowed list
    Applied,
}

/// A visible row: the item's index and the char positions in its title that matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub index: usize,
    pub positions: Vec<usize>,
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Case-insensitive substring match of the trimmed `query` against `title`.
/// Returns the char positions of the first occurrence; an empty query matches
/// everything with no positions.
pub fn filter_match(title: &str, query: &str) -> Option<Vec<usize>> {
    let query: Vec<char> = query.trim().chars().collect();
    if query.is_empty() {
        return Some(Vec::new());
    }
    let title: Vec<char> = title.chars().collect();
    if query.len() > title.len() {
        return None;
    }
    (0..=title.len() - query.len())
        .find(|&start| {
            title[start..start + query.len()]
                .iter()
                .zip(&query)
                .all(|(a, b)| chars_eq_ignore_case(*a, *b))
        })
        .map(|start| (start..start + query.len()).collect())
}

/// Owned items plus filter, selection and scroll state
#[derive(Debug, Clone)]
pub struct SearchableList<T> {
    items: Vec<T>,
    pub filter: TextInput,
    pub filter_state: FilterState,
    matches: Vec<Match>,
    /// Index into the visible rows
    pub selected: Option<usize>,
    pub scroll_offset: usize,
}

impl<T> Default for SearchableList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            filter: TextInput::default(),
            filter_state: FilterState::Unfiltered,
            matches: Vec::new(),
            selected: None,
            scroll_offset: 0,
        }
    }
}

impl<T: ListItem> SearchableList<T> {
    pub fn new(items: Vec<T>) -> Self {
        let mut list = Self {
            items,
            ..Self::default()
        };
        list.refilter();
        list
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Replace the items, keeping the current filter and clamping the selection
    pub fn set_items(&mut self, items: Vec<T>) {
        let previous = self.selected;
        self.items = items;
        self.refilter();
        if let Some(prev) = previous
            && !self.matches.is_empty()
        {
            self.selected = Some(prev.min(self.matches.len() - 1));
        }
    }

    /// Recompute visible rows from the filter query; selection returns to the top
    pub fn refilter(&mut self) {
        let query = self.filter.text.as_str();
        self.matches = self
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                filter_match(item.title(), query).map(|positions| Match { index, positions })
            })
            .collect();
        self.selected = if self.matches.is_empty() { None } else { Some(0) };
        self.scroll_offset = 0;
    }

    pub fn visible_len(&self) -> usize {
        self.matches.len()
    }

    pub fn visible(&self) -> impl Iterator<Item = (&T, &Match)> {
        self.matches.iter().map(|m| (&self.items[m.index], m))
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.selected
            .and_then(|s| self.matches.get(s))
            .map(|m| &self.items[m.index])
    }

    pub fn is_filtering(&self) -> bool {
        self.filter_state == FilterState::Filtering
    }

    pub fn start_filtering(&mut self) {
        self.filter_state = FilterState::Filtering;
    }

    /// Commit the typed query. An empty query leaves the list unfiltered.
    pub fn apply_filter(&mut self) {
        self.filter_state = if self.filter.text.trim().is_empty() {
            self.filter.clear();
            self.refilter();
            FilterState::Unfiltered
        } else {
            FilterState::Applied
        };
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.filter_state = FilterState::Unfiltered;
        self.refilter();
    }

    pub fn edit_filter(&mut self, edit: TextEdit) {
        if self.filter.apply(edit) {
            self.refilter();
        }
    }

    /// Move selection by delta, clamping to bounds
    pub fn move_selection(&mut self, delta: i32) {
        let len = self.matches.len();
        if len == 0 {
            return;
        }
        let current = self.selected.unwrap_or(0);
        let step = delta.unsigned_abs() as usize;
        self.selected = Some(if delta > 0 {
            current.saturating_add(step).min(len - 1)
        } else {
            current.saturating_sub(step)
        });
    }

    pub fn move_to_top(&mut self) {
        if !self.matches.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn move_to_bottom(&mut self) {
        if !self.matches.is_empty() {
            self.selected = Some(self.matches.len() - 1);
        }
    }

    /// Keep the selection one row inside the viewport edges where possible
    pub fn update_scroll_offset_for_selection(&mut self, viewport_rows: usize) {
        let len = self.matches.len();
        if len == 0 {
            self.scroll_offset = 0;
            return;
        }

        let viewport_rows = viewport_rows.max(1);
        let max_offset = len.saturating_sub(viewport_rows);
        let selected = self.selected.unwrap_or(0).min(len - 1);
        let anchor_top = usize::from(viewport_rows > 2);
        let anchor_bottom = viewport_rows.saturating_sub(2);

        if selected < self.scroll_offset.saturating_add(anchor_top) {
            self.scroll_offset = selected.saturating_sub(anchor_top);
        } else if selected > self.scroll_offset.saturating_add(anchor_bottom) {
            self.scroll_offset = selected.saturating_sub(anchor_bottom);
        }

        self.scroll_offset = self.scroll_offset.min(max_offset);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeItem {
    /// Empty for a detached HEAD
    pub branch: String,
    pub path: PathBuf,
    /// `branch` padded to the longest branch in the set, two spaces, then `path`
    pub display: String,
    pub is_main: bool,
}

impl ListItem for WorktreeItem {
    fn title(&self) -> &str {
        &self.display
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchItem {
    pub name: String,
}

impl ListItem for BranchItem {
    fn title(&self) -> &str {
        &self.name
    }
}

fn longest_branch(worktrees: &[Worktree]) -> usize {
    worktrees
        .iter()
        .map(|wt| wt.branch_name().chars().count())
        .max()
        .unwrap_or(0)
}

pub fn build_worktree_items(worktrees: &[Worktree]) -> Vec<WorktreeItem> {
    let width = longest_branch(worktrees);
    worktrees
        .iter()
        .map(|wt| {
            let branch = wt.branch_name().to_string();
            let display = format!("{branch:<width$}  {}", wt.path.display());
            WorktreeItem {
                branch,
                path: wt.path.clone(),
                display,
                is_main: wt.is_main,
            }
        })
        .collect()
}

/// Width of the "Branch" column header: the longest branch, at least [`MIN_BRANCH_COLUMN`]
pub fn branch_column_width(items: &[WorktreeItem]) -> usize {
    items
        .iter()
        .map(|item| item.branch.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_BRANCH_COLUMN)
}

/// Rows available to the list: what the terminal leaves after chrome, but no
/// more than the items plus two rows of padding
pub fn list_viewport_height(terminal_height: u16, item_count: usize) -> usize {
    usize::from(terminal_height.saturating_sub(CHROME_ROWS)).min(item_count.saturating_add(2))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    PickBranch,
    InputBranchName,
    ConfirmNewBranch,
    PromptConfig,
    PromptLibs,
    ConfirmDelete,
    /// Background work in flight; keys are dropped
    Busy(String),
    Help,
}

/// What to do once the TUI has exited
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExitAction {
    #[default]
    None,
    Go(PathBuf),
    Tmux(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn current(self) -> &'static str {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }
}

pub struct AppState {
    pub repo: RepoContext,
    pub mode: Mode,
    pub worktrees: SearchableList<WorktreeItem>,
    pub branches: SearchableList<BranchItem>,
    pub branch_input: TextInput,
    pub pending_branch: Option<String>,
    pub pending_delete: Option<PathBuf>,
    pub base_branch: Option<String>,
    pub copy_config: bool,
    pub copy_libs: bool,
    /// Answers used when a prompt is confirmed with enter
    pub defaults: NewConfig,
    pub status: Option<Status>,
    pub spinner: Spinner,
    pub width: u16,
    pub height: u16,
}

impl AppState {
    pub fn new(repo: RepoContext, worktrees: &[Worktree], defaults: NewConfig) -> Self {
        Self {
            repo,
            mode: Mode::List,
            worktrees: SearchableList::new(build_worktree_items(worktrees)),
            branches: SearchableList::default(),
            branch_input: TextInput::default(),
            pending_branch: None,
            pending_delete: None,
            base_branch: None,
            copy_config: defaults.copy_config,
            copy_libs: defaults.copy_libs,
            defaults,
            status: None,
            spinner: Spinner::default(),
            width: 0,
            height: 0,
        }
    }

    /// Rebuild worktree rows (and their padding) after the on-disk set changed
    pub fn reload_worktrees(&mut self, worktrees: &[Worktree]) {
        self.worktrees.set_items(build_worktree_items(worktrees));
        self.refresh_scroll();
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_pending(&mut self) {
        self.pending_branch = None;
        self.pending_delete = None;
        self.base_branch = None;
    }

    pub fn worktree_rows(&self) -> usize {
        list_viewport_height(self.height, self.worktrees.visible_len())
    }

    pub fn branch_rows(&self) -> usize {
        list_viewport_height(self.height, self.branches.visible_len())
    }

    /// Re-anchor both lists after a selection, filter or size change
    pub fn refresh_scroll(&mut self) {
        let rows = self.worktree_rows();
        self.worktrees.update_scroll_offset_for_selection(rows);
        let rows = self.branch_rows();
        self.branches.update_scroll_offset_for_selection(rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn branches(names: &[&str]) -> SearchableList<BranchItem> {
        SearchableList::new(
            names
                .iter()
                .map(|n| BranchItem {
                    name: (*n).to_string(),
                })
                .collect(),
        )
    }

    fn visible_names(list: &SearchableList<BranchItem>) -> Vec<String> {
        list.visible().map(|(b, _)| b.name.clone()).collect()
    }

    fn input(text: &str) -> TextInput {
        TextInput {
            text: text.to_string(),
            cursor: text.len(),
        }
    }

    #[test]
    fn test_text_input_insert_and_backspace() {
        let mut t = TextInput::default();
        for c in "feat".chars() {
            t.apply(TextEdit::Insert(c));
        }
        assert_eq!(t.text, "feat");
        assert!(t.apply(TextEdit::Backspace));
        assert_eq!(t.text, "fea");
        assert_eq!(t.cursor, 3);
    }

    #[test]
    fn test_text_input_cursor_editing() {
        let mut t = input("fix");
        t.apply(TextEdit::Home);
        t.apply(TextEdit::Insert('/'));
        t.apply(TextEdit::Home);
        t.apply(TextEdit::Insert('a'));
        assert_eq!(t.text, "a/fix");
        assert!(t.apply(TextEdit::Delete));
        assert_eq!(t.text, "afix");
        t.apply(TextEdit::End);
        assert!(!t.apply(TextEdit::Delete));
    }

    #[test]
    fn test_text_input_grapheme_safe() {
        let mut t = input("café👍🏽");
        assert!(t.backspace());
        assert_eq!(t.text, "café");
        t.cursor_left();
        assert_eq!(t.cursor, 3);
        t.insert_char('x');
        assert_eq!(t.text, "cafxé");
    }

    #[test]
    fn test_text_input_delete_word() {
        let mut t = input("hello big  world  ");
        assert!(t.delete_word());
        assert_eq!(t.text, "hello big  ");
        assert!(t.delete_word());
        assert_eq!(t.text, "hello ");
        t.apply(TextEdit::Home);
        assert!(!t.delete_word());
    }

    #[test]
    fn test_filter_match_case_insensitive() {
        assert_eq!(filter_match("Feature/Login", "LOG"), Some(vec![8, 9, 10]));
        assert_eq!(filter_match("main", "xyz"), None);
        assert_eq!(filter_match("main", "  ai "), Some(vec![1, 2]));
        assert_eq!(filter_match("ab", "abc"), None);
    }

    #[test]
    fn test_filter_match_positions_are_chars() {
        assert_eq!(filter_match("überfix", "FIX"), Some(vec![4, 5, 6]));
    }

    #[test]
    fn test_filter_match_len_equals_trimmed_query() {
        let titles = ["main", "feature/auth", "FIX-123", "release/2.0"];
        let queries = ["a", "Au", " fix ", "2.0", "e"];
        for title in titles {
            for query in queries {
                let included = title.to_lowercase().contains(&query.trim().to_lowercase());
                match filter_match(title, query) {
                    Some(positions) => {
                        assert!(included, "{title} / {query}");
                        assert_eq!(positions.len(), query.trim().chars().count());
                    }
                    None => assert!(!included, "{title} / {query}"),
                }
            }
        }
    }

    #[test]
    fn test_empty_query_keeps_order() {
        let list = branches(&["c", "a", "b"]);
        assert_eq!(visible_names(&list), vec!["c", "a", "b"]);
        assert_eq!(list.selected, Some(0));
    }

    #[test]
    fn test_filtering_narrows_and_resets_selection() {
        let mut list = branches(&["main", "feat/a", "feat/b", "dev"]);
        list.move_selection(3);
        list.start_filtering();
        for c in "FEAT".chars() {
            list.edit_filter(TextEdit::Insert(c));
        }
        assert_eq!(visible_names(&list), vec!["feat/a", "feat/b"]);
        assert_eq!(list.selected, Some(0));
        assert_eq!(list.selected_item().unwrap().name, "feat/a");

        list.apply_filter();
        assert_eq!(list.filter_state, FilterState::Applied);

        list.clear_filter();
        assert_eq!(list.visible_len(), 4);
        assert_eq!(list.filter_state, FilterState::Unfiltered);
    }

    #[test]
    fn test_apply_blank_filter_unfilters() {
        let mut list = branches(&["main"]);
        list.start_filtering();
        list.edit_filter(TextEdit::Insert(' '));
        list.apply_filter();
        assert_eq!(list.filter_state, FilterState::Unfiltered);
        assert!(list.filter.is_empty());
    }

    #[test]
    fn test_no_matches_clears_selection() {
        let mut list = branches(&["main"]);
        list.edit_filter(TextEdit::Insert('z'));
        assert_eq!(list.selected, None);
        assert!(list.selected_item().is_none());
        list.move_selection(1);
        assert_eq!(list.selected, None);
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut list = branches(&["a", "b", "c"]);
        list.move_selection(-1);
        assert_eq!(list.selected, Some(0));
        list.move_selection(10);
        assert_eq!(list.selected, Some(2));
        list.move_to_top();
        assert_eq!(list.selected, Some(0));
        list.move_to_bottom();
        assert_eq!(list.selected, Some(2));
    }

    #[test]
    fn test_set_items_clamps_selection() {
        let mut list = branches(&["a", "b", "c"]);
        list.move_to_bottom();
        list.set_items(vec![BranchItem { name: "a".into() }]);
        assert_eq!(list.selected, Some(0));
    }

    #[test]
    fn test_scroll_offset_anchors_inside_edges() {
        let names: Vec<String> = (0..20).map(|i| format!("b{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut list = branches(&refs);

        list.move_selection(8);
        list.update_scroll_offset_for_selection(5);
        // Row 8 sits one above the bottom edge: offset 8 - 3
        assert_eq!(list.scroll_offset, 5);

        list.move_selection(-3);
        list.update_scroll_offset_for_selection(5);
        assert_eq!(list.scroll_offset, 4);

        list.move_to_bottom();
        list.update_scroll_offset_for_selection(5);
        assert_eq!(list.scroll_offset, 15);
    }

    fn wt(path: &str, branch: Option<&str>, is_main: bool) -> Worktree {
        Worktree {
            path: PathBuf::from(path),
            branch: branch.map(String::from),
            is_main,
        }
    }

    #[test]
    fn test_worktree_items_padded_to_longest_branch() {
        let items = build_worktree_items(&[
            wt("/src/app", Some("main"), true),
            wt("/src/app-worktrees/feat/x", Some("feat/x"), false),
            wt("/src/app-worktrees/det", None, false),
        ]);
        assert_eq!(items[0].display, "main    /src/app");
        assert_eq!(items[1].display, "feat/x  /src/app-worktrees/feat/x");
        assert_eq!(items[2].display, "        /src/app-worktrees/det");
        assert!(items[0].is_main);
    }

    #[test]
    fn test_branch_column_width_floor() {
        let short = build_worktree_items(&[wt("/a", Some("dev"), true)]);
        assert_eq!(branch_column_width(&short), 6);
        let long = build_worktree_items(&[wt("/a", Some("feature/long-name"), true)]);
        assert_eq!(branch_column_width(&long), 17);
        assert_eq!(branch_column_width(&[]), 6);
    }

    #[test]
    fn test_list_viewport_height() {
        assert_eq!(list_viewport_height(40, 3), 5);
        assert_eq!(list_viewport_height(10, 30), 4);
        assert_eq!(list_viewport_height(4, 30), 0);
    }

    #[test]
    fn test_spinner_cycles() {
        let mut spinner = Spinner::default();
        let first = spinner.current();
        for _ in 0..SPINNER_FRAMES.len() {
            spinner.tick();
        }
        assert_eq!(spinner.current(), first);
        spinner.tick();
        assert_ne!(spinner.current(), first);
    }
}
