pub const HEADER_LEN: usize = 6;
pub const LENGTH_PREFIX_LEN: usize = 2;
pub const ATTRIBUTE_COUNT: usize = 4;

pub const ATTRIBUTE_MAX_LEN: usize = 255;
pub const MAX_RECORD_LEN: usize = 2048;

pub const MIN_RECORD_LEN: usize = HEADER_LEN + ATTRIBUTE_COUNT * LENGTH_PREFIX_LEN;
