use thiserror::Error;

/// Errors that can occur while parsing a declarative input spec into a registry.
#[derive(Error, Debug, Clone)]
pub enum SpecError {
    #[error("Failed to parse input spec JSON: {0}")]
    JsonParseError(String),

    #[error("Input '{name}' produces an unusable membership matcher: {reason}")]
    InvalidMatcher { name: String, reason: String },

    #[error(
        "Inputs '{first}' and '{second}' share the numeric base name '{base}', which makes group membership ambiguous"
    )]
    DuplicateBaseName {
        first: String,
        second: String,
        base: String,
    },

    #[error(
        "Groups {first_group} and {second_group} both use the letter scheme; letter names cannot be told apart between groups"
    )]
    AmbiguousLetterGroups { first_group: u32, second_group: u32 },

    #[error(
        "Group {group} declares {members} letter-scheme members; letter names cannot be told apart within a row"
    )]
    MultiMemberLetterGroup { group: u32, members: usize },
}

/// Errors that can occur when converting a custom host declaration format into an `InputSpec`.
#[derive(Error, Debug, Clone)]
pub enum SpecConversionError {
    #[error("Invalid input declaration: {0}")]
    ValidationError(String),
}

/// Errors that can occur during a slot-layout mutation pass.
#[derive(Error, Debug, Clone)]
pub enum LayoutError {
    #[error("Slot indices {a} and {b} are not a valid swap pair for {len} slots")]
    SwapIndices { a: usize, b: usize, len: usize },

    #[error("Slot {with_holder} carries a value holder but its swap partner {without_holder} does not")]
    HolderMismatch {
        with_holder: usize,
        without_holder: usize,
    },

    #[error("Group {group} holds {count} slots, which is not a multiple of its {members} member definitions")]
    RaggedGroup {
        group: u32,
        count: usize,
        members: usize,
    },

    #[error("Group {group} occupies non-contiguous positions (gap after position {position})")]
    NonContiguousGroup { group: u32, position: usize },

    #[error("Group {group} is at the naming scheme's capacity of {capacity} rows")]
    AtCapacity { group: u32, capacity: usize },

    #[error("No slot at position {0}")]
    NoSuchSlot(usize),

    #[error("Slot at position {0} carries no value holder")]
    NoSuchHolder(usize),
}
