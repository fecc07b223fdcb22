/// Lower bound on a single vote's strength.
pub const MIN_VOTE_STRENGTH: u32 = 1;

/// Upper bound on proposal title length.
pub const MAX_TITLE_LENGTH: usize = 200;
