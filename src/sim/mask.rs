//! Pixel-accurate collision masks
//!
//! Ships and lasers are not rectangles, so hits are decided by testing the
//! opaque pixels of two sprites against each other at their relative offset.
//! A mask is built once per footprint and shared by every entity drawn with it.

use std::fmt;
use std::sync::Arc;

use glam::Vec2;

/// Alpha values above this count as opaque
pub const ALPHA_THRESHOLD: u8 = 127;

/// Problems building a mask from raw data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// A row of an ASCII mask has a different width from the first row
    RaggedRows { row: usize, expected: usize, found: usize },
    /// Pixel buffer does not match the declared dimensions
    BufferLength { expected: usize, found: usize },
    /// Pixel count does not fit in a `u32`
    TooLarge { width: u32, height: u32 },
}

impl fmt::Display for MaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RaggedRows { row, expected, found } => {
                write!(f, "row {row} is {found} wide, expected {expected}")
            }
            Self::BufferLength { expected, found } => {
                write!(f, "pixel buffer holds {found} bytes, expected {expected}")
            }
            Self::TooLarge { width, height } => write!(f, "{width}x{height} is too large"),
        }
    }
}

impl std::error::Error for MaskError {}

/// Per-pixel opacity footprint of a sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    /// Row-major opacity bits
    bits: Vec<bool>,
}

impl CollisionMask {
    fn filled(width: u32, height: u32, opaque: bool) -> Result<Self, MaskError> {
        Ok(Self {
            width,
            height,
            bits: vec![opaque; area(width, height)?],
        })
    }

    /// Fully transparent mask
    pub fn new(width: u32, height: u32) -> Result<Self, MaskError> {
        Self::filled(width, height, false)
    }

    /// Fully opaque rectangle
    pub fn rect(width: u32, height: u32) -> Result<Self, MaskError> {
        Self::filled(width, height, true)
    }

    /// Ellipse inscribed in a `width` x `height` box
    pub fn ellipse(width: u32, height: u32) -> Result<Self, MaskError> {
        let mut mask = Self::new(width, height)?;
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        for y in 0..height {
            for x in 0..width {
                // Sample pixel centres
                let dx = (x as f32 + 0.5 - rx) / rx;
                let dy = (y as f32 + 0.5 - ry) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    mask.set(x, y, true);
                }
            }
        }
        Ok(mask)
    }

    /// Build from ASCII rows: `#` (or `X`) is opaque, anything else clear
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MaskError> {
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let too_large = || MaskError::TooLarge {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(rows.len()).unwrap_or(u32::MAX),
        };
        let mut mask = Self::new(
            u32::try_from(width).map_err(|_| too_large())?,
            u32::try_from(rows.len()).map_err(|_| too_large())?,
        )?;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MaskError::RaggedRows {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, c) in row.chars().enumerate() {
                mask.set(x as u32, y as u32, matches!(c, '#' | 'X'));
            }
        }
        Ok(mask)
    }

    /// Build from one alpha byte per pixel
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Result<Self, MaskError> {
        let expected = area(width, height)?;
        if alpha.len() != expected {
            return Err(MaskError::BufferLength {
                expected,
                found: alpha.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bits: alpha.iter().map(|&a| a > ALPHA_THRESHOLD).collect(),
        })
    }

    /// Build from tightly packed RGBA8 pixels (alpha channel only)
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self, MaskError> {
        let expected = area(width, height)? * 4;
        if rgba.len() != expected {
            return Err(MaskError::BufferLength {
                expected,
                found: rgba.len(),
            });
        }
        let alpha: Vec<u8> = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Self::from_alpha(width, height, &alpha)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Opacity at (x, y); out-of-bounds pixels are transparent
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = opaque;
        }
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Does `other`, placed at `offset` relative to this mask's origin, share
    /// any opaque pixel with this mask?
    pub fn overlaps(&self, other: &CollisionMask, offset: (i32, i32)) -> bool {
        let (ox, oy) = (i64::from(offset.0), i64::from(offset.1));

        // Intersection of the two boxes in this mask's coordinates. Widened so
        // far-apart sprites cannot overflow.
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = i64::from(self.width).min(ox + i64::from(other.width));
        let y1 = i64::from(self.height).min(oy + i64::from(other.height));
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        // Non-empty intersection lies inside both masks, so every coordinate
        // below fits back into i32
        let pixel = |mask: &CollisionMask, x: i64, y: i64| mask.get(x as i32, y as i32);
        (y0..y1).any(|y| (x0..x1).any(|x| pixel(self, x, y) && pixel(other, x - ox, y - oy)))
    }
}

/// Pixel count of a `width` x `height` mask, bounded so row-major indices fit
/// in a `u32`
fn area(width: u32, height: u32) -> Result<usize, MaskError> {
    width
        .checked_mul(height)
        .map(|n| n as usize)
        .ok_or(MaskError::TooLarge { width, height })
}

/// Named, shared handle to a mask (what entities carry around)
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub name: String,
    pub mask: Arc<CollisionMask>,
}

impl Footprint {
    pub fn new(name: impl Into<String>, mask: CollisionMask) -> Self {
        Self {
            name: name.into(),
            mask: Arc::new(mask),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.mask.width() as f32
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.mask.height() as f32
    }
}

/// Anything with a top-left position and a collision mask
pub trait Sprite {
    fn position(&self) -> Vec2;
    fn mask(&self) -> &CollisionMask;
}

/// Pixel-accurate overlap test between two positioned sprites
///
/// The offset is truncated toward zero, which keeps `collide(a, b)` equal to
/// `collide(b, a)`.
pub fn collide<A, B>(a: &A, b: &B) -> bool
where
    A: Sprite + ?Sized,
    B: Sprite + ?Sized,
{
    let delta = b.position() - a.position();
    let offset = (delta.x as i32, delta.y as i32);
    a.mask().overlaps(b.mask(), offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Probe {
        pos: Vec2,
        mask: CollisionMask,
    }

    impl Sprite for Probe {
        fn position(&self) -> Vec2 {
            self.pos
        }
        fn mask(&self) -> &CollisionMask {
            &self.mask
        }
    }

    fn probe(x: f32, y: f32, mask: CollisionMask) -> Probe {
        Probe {
            pos: Vec2::new(x, y),
            mask,
        }
    }

    #[test]
    fn test_rects_touching_at_same_position() {
        let a = probe(10.0, 10.0, CollisionMask::rect(4, 4).unwrap());
        let b = probe(10.0, 10.0, CollisionMask::rect(2, 2).unwrap());
        assert!(collide(&a, &b));
    }

    #[test]
    fn test_adjacent_rects_do_not_collide() {
        let a = probe(0.0, 0.0, CollisionMask::rect(4, 4).unwrap());
        let b = probe(4.0, 0.0, CollisionMask::rect(4, 4).unwrap());
        assert!(!collide(&a, &b));
        let c = probe(3.0, 3.0, CollisionMask::rect(4, 4).unwrap());
        assert!(collide(&a, &c));
    }

    #[test]
    fn test_negative_offset() {
        let a = probe(5.0, 5.0, CollisionMask::rect(4, 4).unwrap());
        let b = probe(2.0, 2.0, CollisionMask::rect(4, 4).unwrap());
        assert!(collide(&a, &b));
        assert!(collide(&b, &a));
    }

    #[test]
    fn test_transparent_footprint_never_collides() {
        let a = probe(0.0, 0.0, CollisionMask::rect(8, 8).unwrap());
        let ghost = probe(0.0, 0.0, CollisionMask::new(8, 8).unwrap());
        assert!(!collide(&a, &ghost));
        assert!(!collide(&ghost, &a));
    }

    #[test]
    fn test_bounding_boxes_overlap_but_pixels_do_not() {
        // Two diagonal slashes whose boxes overlap fully but whose pixels miss
        let a = probe(0.0, 0.0, CollisionMask::from_rows(&["#..", ".#.", "..#"]).unwrap());
        let b = probe(0.0, 0.0, CollisionMask::from_rows(&["..#", "...", "#.."]).unwrap());
        assert!(!collide(&a, &b));

        let c = probe(1.0, 0.0, CollisionMask::from_rows(&["#"]).unwrap());
        assert!(!collide(&a, &c));
        let d = probe(1.0, 1.0, CollisionMask::from_rows(&["#"]).unwrap());
        assert!(collide(&a, &d));
    }

    #[test]
    fn test_ellipse_corners_are_clear() {
        let mask = CollisionMask::ellipse(32, 32).unwrap();
        assert!(!mask.get(0, 0));
        assert!(!mask.get(31, 31));
        assert!(mask.get(16, 16));
        assert!(mask.count() < 32 * 32);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let err = CollisionMask::from_rows(&["##", "#"]).unwrap_err();
        assert_eq!(
            err,
            MaskError::RaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_from_rgba_uses_alpha_channel() {
        let rgba = [
            255, 0, 0, 255, // opaque
            255, 0, 0, 0, // clear
            0, 0, 0, 128, // just above threshold
            0, 0, 0, 127, // at threshold: clear
        ];
        let mask = CollisionMask::from_rgba(2, 2, &rgba).unwrap();
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(0, 1));
        assert!(!mask.get(1, 1));
        assert!(CollisionMask::from_rgba(2, 2, &rgba[..8]).is_err());
    }

    #[test]
    fn test_oversized_dimensions_are_rejected() {
        let too_large = MaskError::TooLarge {
            width: 70_000,
            height: 70_000,
        };
        assert_eq!(CollisionMask::rect(70_000, 70_000), Err(too_large.clone()));
        assert_eq!(CollisionMask::new(70_000, 70_000), Err(too_large.clone()));
        assert_eq!(CollisionMask::from_alpha(70_000, 70_000, &[]), Err(too_large.clone()));
        assert_eq!(CollisionMask::from_rgba(70_000, 70_000, &[]), Err(too_large));
    }

    #[test]
    fn test_far_apart_sprites_do_not_overflow() {
        let near = probe(0.0, 0.0, CollisionMask::rect(64, 64).unwrap());
        let far = probe(0.0, -3.0e9, CollisionMask::rect(64, 64).unwrap());
        assert!(!collide(&near, &far));
        assert!(!collide(&far, &near));
        let edge = probe(3.0e9, 3.0e9, CollisionMask::rect(64, 64).unwrap());
        assert!(!collide(&near, &edge));
        assert!(!collide(&edge, &near));
    }

    fn arb_mask() -> impl Strategy<Value = CollisionMask> {
        (1u32..8, 1u32..8).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<bool>(), (w * h) as usize).prop_map(move |bits| {
                CollisionMask {
                    width: w,
                    height: h,
                    bits,
                }
            })
        })
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(
            a in arb_mask(),
            b in arb_mask(),
            ax in -20.0f32..20.0,
            ay in -20.0f32..20.0,
            bx in -20.0f32..20.0,
            by in -20.0f32..20.0,
        ) {
            let pa = probe(ax, ay, a);
            let pb = probe(bx, by, b);
            prop_assert_eq!(collide(&pa, &pb), collide(&pb, &pa));
        }
    }
}
