//! Overlay removal.
//!
//! After every move, a dragged point that lands on a static neighbour is
//! absorbed into it. With an orthogonal router and a dragged segment, the
//! segment is merged into an aligned run of neighbouring points instead.

use log::debug;

use crate::error::BendError;
use crate::geometry::Orientation;
use crate::model::AnchorSpec;

use super::index;
use super::policy::BendGesture;

/// Neighbour offsets (relative to the connection index of the dragged
/// segment's first point) tried in this order; the first match wins.
const SEGMENT_TEMPLATES: [&[isize]; 8] = [
    &[-2, -1, 2, 3],
    &[-2, -1, 2],
    &[-1, 2, 3],
    &[-1, 2],
    &[-2, -1],
    &[2, 3],
    &[2],
    &[-1],
];

impl BendGesture<'_> {
    /// Merge the selection into overlapping neighbours, then re-route.
    ///
    /// Returns true if any anchor was removed.
    pub fn remove_overlain(&mut self) -> Result<bool, BendError> {
        let removed = if self.selection.len() == 2 && self.strategy.is_orthogonal() {
            self.remove_overlain_segment()?
        } else {
            self.remove_overlain_points()?
        };
        self.route()?;
        Ok(removed)
    }

    fn remove_overlain_points(&mut self) -> Result<bool, BendError> {
        let threshold = self.overlay_threshold();
        let mut live: Vec<Option<usize>> = self.selected_indices().into_iter().map(Some).collect();
        let mut order: Vec<usize> = (0..live.len()).collect();
        order.sort_by_key(|&slot| std::cmp::Reverse(live[slot]));

        let mut removed_any = false;
        for slot in order {
            let count = self.explicit_count();
            if count <= 2 {
                break;
            }
            let Some(index) = live[slot] else { continue };

            let position = self.explicit_position(index)?;
            let neighbors = [index.checked_sub(1), Some(index + 1).filter(|&n| n < count)];
            let mut absorbed = false;
            for neighbor in neighbors.into_iter().flatten() {
                if live.contains(&Some(neighbor)) {
                    continue;
                }
                if self.explicit_position(neighbor)?.distance(position) <= threshold {
                    absorbed = true;
                    break;
                }
            }
            if !absorbed {
                continue;
            }

            self.operation.final_anchors_mut().remove(index);
            self.route()?;
            debug!("absorbed dragged anchor {} into its neighbour", index);
            removed_any = true;

            live[slot] = None;
            for other in live.iter_mut().flatten() {
                if *other > index {
                    *other -= 1;
                }
            }
        }
        Ok(removed_any)
    }

    fn remove_overlain_segment(&mut self) -> Result<bool, BendError> {
        let selected = self.selected_indices();
        let (first, second) = (selected[0].min(selected[1]), selected[0].max(selected[1]));
        let s = index::visual_index(self.routed(), first)?;
        if index::visual_index(self.routed(), second)? != s + 1 {
            return Ok(false);
        }

        let tolerance = self.config.axis_tolerance;
        let (from, to) = (self.routed()[s].position, self.routed()[s + 1].position);
        let orientation = Orientation::of_segment(from, to, tolerance);
        let dragged_axis = orientation.axis_position(from);
        let threshold = self.overlay_threshold();

        for template in SEGMENT_TEMPLATES {
            let Some(axis) = self.template_axis(template, s, orientation) else {
                continue;
            };
            if (dragged_axis - axis).abs() <= threshold {
                self.merge_segment(template, s, orientation, axis)?;
                debug!("merged dragged segment using template {:?}", template);
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Shared axis position of a template's candidates, if they all exist
    /// and line up
    fn template_axis(&self, template: &[isize], s: usize, orientation: Orientation) -> Option<f64> {
        let routed = self.routed();
        let tolerance = self.config.axis_tolerance;
        let mut axis: Option<f64> = None;
        for offset in template {
            let ci = s.checked_add_signed(*offset)?;
            let value = orientation.axis_position(routed.get(ci)?.position);
            match axis {
                None => axis = Some(value),
                Some(first) if (first - value).abs() <= tolerance => {}
                Some(_) => return None,
            }
        }
        axis
    }

    fn merge_segment(
        &mut self,
        template: &[isize],
        s: usize,
        orientation: Orientation,
        axis: f64,
    ) -> Result<(), BendError> {
        let min_offset = template.iter().copied().min().unwrap_or(0).min(0);
        let max_offset = template.iter().copied().max().unwrap_or(1).max(1);
        let lo = s.saturating_add_signed(min_offset);
        let hi = s.saturating_add_signed(max_offset);

        let explicit = self.make_explicit(lo, hi)?;
        let (Some(&first), Some(&last)) = (explicit.first(), explicit.last()) else {
            return Ok(());
        };
        if last > first + 1 {
            self.operation.final_anchors_mut().drain(first + 1..last);
        }

        let count = self.explicit_count();
        let anchors = self.operation.final_anchors_mut();
        for survivor in [first, first + 1] {
            if survivor == 0 || survivor + 1 >= count {
                continue;
            }
            if let Some(AnchorSpec::Free { position }) = anchors.get_mut(survivor) {
                *position = orientation.with_axis_position(*position, axis);
            }
        }
        Ok(())
    }
}
