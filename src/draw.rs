use std::vec::Vec;

use crate::model::Resolution;

/******************************************************************************/

pub type SkyIndex = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    TriangleFan,
    TriangleStrip,
}

/// Indexed draw request: `count` indices starting at byte `offset` of the
/// element buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub count: usize,
    pub offset: usize,
}

/// North pole fan, one strip per latitude band, south pole fan.
pub fn sky_draw_calls(resolution: &Resolution) -> Vec<DrawCall> {
    let index_size = std::mem::size_of::<SkyIndex>();
    let fan = resolution.fan_len();
    let strip = resolution.strip_len();

    let mut calls = Vec::with_capacity(resolution.num_strips() + 2);
    calls.push(DrawCall{primitive: Primitive::TriangleFan, count: fan, offset: 0});
    let mut offset = fan * index_size;
    for _ in 0..resolution.num_strips() {
        calls.push(DrawCall{primitive: Primitive::TriangleStrip, count: strip, offset});
        offset += strip * index_size;
    }
    calls.push(DrawCall{primitive: Primitive::TriangleFan, count: fan, offset});
    calls
}

/******************************************************************************/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_plan_lats4_longs5() {
        let calls = sky_draw_calls(&Resolution::new(4, 5).unwrap());
        let expected = vec![
            DrawCall{primitive: Primitive::TriangleFan, count: 6, offset: 0},
            DrawCall{primitive: Primitive::TriangleStrip, count: 10, offset: 24},
            DrawCall{primitive: Primitive::TriangleStrip, count: 10, offset: 64},
            DrawCall{primitive: Primitive::TriangleFan, count: 6, offset: 104},
        ];
        assert_eq!(calls, expected);
    }

    #[test]
    fn draw_plan_covers_index_buffer() {
        for lats in 3..20 {
            for longs in 3..20 {
                let r = Resolution::new(lats, longs).unwrap();
                let calls = sky_draw_calls(&r);
                assert_eq!(calls.len(), lats as usize);
                let mut expected_offset = 0;
                for call in &calls {
                    assert_eq!(call.offset, expected_offset);
                    expected_offset += call.count * std::mem::size_of::<SkyIndex>();
                }
                assert_eq!(expected_offset, r.num_indices() * 4);
            }
        }
    }
}
