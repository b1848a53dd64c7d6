//! Character constants for the constellation.

/// Circle glyphs, small to large.
pub const CIRCLE_CHARS: &[char] = &['·', '•', '●'];

/// Diamond glyphs, small to large.
pub const DIAMOND_CHARS: &[char] = &['⋄', '◇', '◆'];

/// Triangle glyphs, small to large.
pub const TRIANGLE_CHARS: &[char] = &['˄', '△', '▲'];

/// Meteor head glyph.
pub const METEOR_HEAD: char = '✦';
