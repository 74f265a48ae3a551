use std::collections::HashMap;

use serde::Serialize;

/// Space kept above the active row on narrow viewports.
pub const NARROW_LEAD_IN: f64 = 15.0;
pub const WIDE_LEAD_IN: f64 = 20.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ScrollBehavior {
    /// Jump straight to the offset
    Instant,
    Smooth,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrollRequest {
    pub item_id: u32,
    pub offset: f64,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    pub fn for_item(item_id: u32, element_offset: f64, narrow: bool) -> Self {
        let lead_in = if narrow { NARROW_LEAD_IN } else { WIDE_LEAD_IN };
        Self {
            item_id,
            offset: (element_offset - lead_in).max(0.0),
            behavior: if narrow {
                ScrollBehavior::Instant
            } else {
                ScrollBehavior::Smooth
            },
        }
    }
}

/// Row offsets inside the transcript scroller, as measured by the renderer.
#[derive(Debug, Clone, Default)]
pub struct TranscriptLayout {
    offsets: HashMap<u32, f64>,
}

impl TranscriptLayout {
    pub fn replace(&mut self, offsets: impl IntoIterator<Item = (u32, f64)>) {
        self.offsets = offsets.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.offsets.clear();
    }

    pub fn offset_of(&self, item_id: u32) -> Option<f64> {
        self.offsets.get(&item_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lead_in_and_behavior_follow_viewport_width() {
        let wide = ScrollRequest::for_item(4, 300.0, false);
        assert_eq!(wide.offset, 280.0);
        assert_eq!(wide.behavior, ScrollBehavior::Smooth);

        let narrow = ScrollRequest::for_item(4, 300.0, true);
        assert_eq!(narrow.offset, 285.0);
        assert_eq!(narrow.behavior, ScrollBehavior::Instant);
    }

    #[test]
    fn offset_never_goes_negative() {
        assert_eq!(ScrollRequest::for_item(1, 8.0, false).offset, 0.0);
    }

    #[test]
    fn layout_lookup() {
        let mut layout = TranscriptLayout::default();
        layout.replace([(1, 0.0), (2, 48.0)]);
        assert_eq!(layout.offset_of(2), Some(48.0));
        assert_eq!(layout.offset_of(3), None);
        layout.clear();
        assert_eq!(layout.offset_of(2), None);
    }
}
