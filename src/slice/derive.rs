use std::collections::BTreeSet;

use crate::error::{ArgumentError, Result};
use crate::topology::{OutlineStore, PolylineId};

use super::Slice;

impl<'a> Slice<'a> {
    /// Derives the slice around the reference segment `(lower_index,
    /// lower_index + 1)` bounded by the nearest selected indices.
    ///
    /// On an open polyline the slice extends to the nearest selected index
    /// on each side of the segment, or to the polyline's ends. On a closed
    /// polyline at least two indices must be selected and the search wraps
    /// around the join vertex; the resulting slice never contains the join
    /// vertex twice.
    ///
    /// Returns `Ok(None)` when no slice exists, e.g. both bounds collapse to
    /// a single vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the polyline is unknown or `lower_index` doesn't
    /// denote a segment of it.
    pub fn from_selection(
        store: &'a OutlineStore,
        polyline: PolylineId,
        lower_index: usize,
        selected: &BTreeSet<usize>,
    ) -> Result<Option<Self>> {
        let data = store.polyline(polyline)?;
        let len = data.len();
        if lower_index >= len.saturating_sub(1) {
            return Err(ArgumentError::IndexOutOfRange {
                name: "lower_index",
                index: lower_index,
                len: len.saturating_sub(1),
            }
            .into());
        }
        let li = lower_index;

        if !data.is_closed() {
            let lower = (0..=li).rev().find(|i| selected.contains(i)).unwrap_or(0);
            let upper = (li + 1..len)
                .find(|i| selected.contains(i))
                .unwrap_or(len - 1);
            tracing::trace!(?polyline, li, lower, upper, "open slice bounds");
            if lower == upper {
                return Ok(None);
            }
            return Self::new(store, polyline, lower, upper).map(Some);
        }

        if selected.len() < 2 {
            return Ok(None);
        }
        let lower = (0..=li)
            .rev()
            .chain((li + 1..len).rev())
            .find(|i| selected.contains(i));
        let upper = (li + 1..len - 1)
            .find(|i| selected.contains(i))
            .or_else(|| {
                (0..li)
                    .find(|i| selected.contains(i))
                    .map(|i| if i == 0 { len - 1 } else { i })
            });
        let (Some(lower), Some(upper)) = (lower, upper) else {
            return Ok(None);
        };
        tracing::trace!(?polyline, li, lower, upper, "closed slice bounds");

        let slice = if lower < upper {
            if upper == len - 1 {
                Self::with_direction(store, polyline, 0, lower, false)?
            } else {
                Self::new(store, polyline, lower, upper)?
            }
        } else if lower == upper {
            Self::with_direction(store, polyline, 0, upper, false)?
        } else {
            Self::with_direction(store, polyline, upper, lower, false)?
        };
        Ok(Some(slice))
    }
}
