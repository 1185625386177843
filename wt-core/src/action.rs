/// Every user interaction produces an Action. The state machine never sees raw keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Exit
    Quit,
    /// ctrl+c: leave from any mode, even while busy
    ForceQuit,

    // Generic
    Submit,
    Cancel,
    /// y / n in a prompt
    Answer(bool),

    // List shortcuts
    OpenTmux,
    NewWorktree,
    DeleteWorktree,
    BranchFromBase,
    ShowHelp,
    /// Any key while the help overlay is shown
    DismissHelp,

    // Filter and text entry
    StartFilter,
    Edit(TextEdit),

    // Movement
    MoveSelection(i32),
    MoveTop,
    MoveBottom,
}

/// Cursor-aware edits shared by the list filter and the branch-name input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Backspace,
    Delete,
    DeleteWord,
    Left,
    Right,
    Home,
    End,
}
