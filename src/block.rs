//! Block catalog and optical properties.
//!
//! Every cell of a board holds one of eight block variants: the four optical
//! kinds (blank, opaque, reflect, refract), each either fixed by the puzzle
//! or free to be replaced by a movable block.

use std::fmt;

/// A cell state.
///
/// Optical behavior and fixed-ness are independent: [`Block::fix`] and
/// [`Block::unfix`] toggle the latter without touching the former.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Block {
    Blank,
    Opaque,
    Reflect,
    Refract,
    FixedBlank,
    FixedOpaque,
    FixedReflect,
    FixedRefract,
}

impl Block {
    /// All eight variants.
    pub const ALL: [Block; 8] = [
        Block::Blank,
        Block::Opaque,
        Block::Reflect,
        Block::Refract,
        Block::FixedBlank,
        Block::FixedOpaque,
        Block::FixedReflect,
        Block::FixedRefract,
    ];

    /// Block types that may appear in a movable pool, in placement order.
    pub const PLACEABLE: [Block; 3] = [Block::Opaque, Block::Reflect, Block::Refract];

    #[inline]
    pub const fn is_fixed(self) -> bool {
        matches!(
            self,
            Block::FixedBlank | Block::FixedOpaque | Block::FixedReflect | Block::FixedRefract
        )
    }

    #[inline]
    pub const fn is_reflective(self) -> bool {
        matches!(
            self,
            Block::Reflect | Block::Refract | Block::FixedReflect | Block::FixedRefract
        )
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        matches!(
            self,
            Block::Blank | Block::Refract | Block::FixedBlank | Block::FixedRefract
        )
    }

    /// Returns the fixed counterpart with the same optical properties.
    pub const fn fix(self) -> Block {
        match self {
            Block::Blank | Block::FixedBlank => Block::FixedBlank,
            Block::Opaque | Block::FixedOpaque => Block::FixedOpaque,
            Block::Reflect | Block::FixedReflect => Block::FixedReflect,
            Block::Refract | Block::FixedRefract => Block::FixedRefract,
        }
    }

    /// Returns the movable counterpart with the same optical properties.
    pub const fn unfix(self) -> Block {
        match self {
            Block::Blank | Block::FixedBlank => Block::Blank,
            Block::Opaque | Block::FixedOpaque => Block::Opaque,
            Block::Reflect | Block::FixedReflect => Block::Reflect,
            Block::Refract | Block::FixedRefract => Block::Refract,
        }
    }

    /// Whether this block may be a member of a movable pool.
    ///
    /// Blank is never placed explicitly, and fixed blocks belong to the grid.
    #[inline]
    pub const fn is_placeable(self) -> bool {
        matches!(self, Block::Opaque | Block::Reflect | Block::Refract)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Block::Blank => "BLANK",
            Block::Opaque => "OPAQUE",
            Block::Reflect => "REFLECT",
            Block::Refract => "REFRACT",
            Block::FixedBlank => "FIXED_BLANK",
            Block::FixedOpaque => "FIXED_OPAQUE",
            Block::FixedReflect => "FIXED_REFLECT",
            Block::FixedRefract => "FIXED_REFRACT",
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_optical_properties() {
        let expected = [
            // (block, transparent, reflective, fixed)
            (Block::Blank, true, false, false),
            (Block::Opaque, false, false, false),
            (Block::Reflect, false, true, false),
            (Block::Refract, true, true, false),
            (Block::FixedBlank, true, false, true),
            (Block::FixedOpaque, false, false, true),
            (Block::FixedReflect, false, true, true),
            (Block::FixedRefract, true, true, true),
        ];
        for (block, transparent, reflective, fixed) in expected {
            assert_eq!(block.is_transparent(), transparent, "{block} transparency");
            assert_eq!(block.is_reflective(), reflective, "{block} reflectivity");
            assert_eq!(block.is_fixed(), fixed, "{block} fixed-ness");
        }
    }

    #[test]
    fn test_fix_and_unfix() {
        assert_eq!(Block::Refract.fix(), Block::FixedRefract);
        assert!(Block::Refract.fix().is_fixed());
        assert_eq!(Block::FixedReflect.unfix(), Block::Reflect);
        assert!(!Block::FixedReflect.unfix().is_fixed());
        assert_eq!(Block::FixedOpaque.fix(), Block::FixedOpaque);
        assert_eq!(Block::Blank.unfix(), Block::Blank);
    }

    #[test]
    fn test_only_movable_optics_are_placeable() {
        let placeable: Vec<Block> = Block::ALL.into_iter().filter(|b| b.is_placeable()).collect();
        assert_eq!(placeable, Block::PLACEABLE.to_vec());
    }

    #[test]
    fn test_variants_are_distinct_property_combinations() {
        let mut seen = std::collections::HashSet::new();
        for block in Block::ALL {
            let key = (block.is_transparent(), block.is_reflective(), block.is_fixed());
            assert!(seen.insert(key), "{block} duplicates {key:?}");
        }
        assert_eq!(seen.len(), 8);
    }

    fn any_block() -> impl Strategy<Value = Block> {
        proptest::sample::select(Block::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_unfix_after_fix_restores_movable(block in any_block()) {
            prop_assert_eq!(block.fix().unfix(), block.unfix());
            if !block.is_fixed() {
                prop_assert_eq!(block.fix().unfix(), block);
            }
        }

        #[test]
        fn prop_fix_preserves_optics(block in any_block()) {
            let fixed = block.unfix().fix();
            prop_assert!(fixed.is_fixed());
            prop_assert_eq!(fixed.is_transparent(), block.is_transparent());
            prop_assert_eq!(fixed.is_reflective(), block.is_reflective());
        }
    }
}
