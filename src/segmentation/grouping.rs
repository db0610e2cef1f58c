//! Spatial bucketing of regions
//!
//! Segmentation reports regions in discovery order. Sheets generated with a
//! fixed layout ("heads top-left, bodies top-right") need regions grouped by
//! where they sit on the sheet instead.

use crate::segmentation::segmenter::Region;

/// Quarter of a sheet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Upper left quarter
    TopLeft,
    /// Upper right quarter
    TopRight,
    /// Lower left quarter
    BottomLeft,
    /// Lower right quarter
    BottomRight,
}

impl Quadrant {
    /// Quadrant holding the center of a region's bounding box
    pub const fn of(region: &Region, sheet_width: usize, sheet_height: usize) -> Self {
        let bounds = region.bounding_box;
        // Doubled coordinates keep the center comparison in integers
        let left_half = 2 * bounds.left + bounds.width < sheet_width;
        let top_half = 2 * bounds.top + bounds.height < sheet_height;
        match (top_half, left_half) {
            (true, true) => Self::TopLeft,
            (true, false) => Self::TopRight,
            (false, true) => Self::BottomLeft,
            (false, false) => Self::BottomRight,
        }
    }
}

/// Regions split by quadrant, each bucket in discovery order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadrantGroups {
    /// Regions centered in the upper left quarter
    pub top_left: Vec<Region>,
    /// Regions centered in the upper right quarter
    pub top_right: Vec<Region>,
    /// Regions centered in the lower left quarter
    pub bottom_left: Vec<Region>,
    /// Regions centered in the lower right quarter
    pub bottom_right: Vec<Region>,
}

impl QuadrantGroups {
    /// Regions in one quadrant
    pub fn get(&self, quadrant: Quadrant) -> &[Region] {
        match quadrant {
            Quadrant::TopLeft => &self.top_left,
            Quadrant::TopRight => &self.top_right,
            Quadrant::BottomLeft => &self.bottom_left,
            Quadrant::BottomRight => &self.bottom_right,
        }
    }

    /// Total number of grouped regions
    pub const fn len(&self) -> usize {
        self.top_left.len() + self.top_right.len() + self.bottom_left.len() + self.bottom_right.len()
    }

    /// Test whether no regions were grouped
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket regions by the quadrant of their bounding-box center
pub fn group_by_quadrant(
    regions: &[Region],
    sheet_width: usize,
    sheet_height: usize,
) -> QuadrantGroups {
    let mut groups = QuadrantGroups::default();
    for region in regions {
        let bucket = match Quadrant::of(region, sheet_width, sheet_height) {
            Quadrant::TopLeft => &mut groups.top_left,
            Quadrant::TopRight => &mut groups.top_right,
            Quadrant::BottomLeft => &mut groups.bottom_left,
            Quadrant::BottomRight => &mut groups.bottom_right,
        };
        bucket.push(*region);
    }
    groups
}

/// Order regions top-to-bottom, then left-to-right within a row
///
/// Regions whose tops are within `row_tolerance` of the first region of a
/// row belong to that row.
pub fn sort_reading_order(regions: &[Region], row_tolerance: usize) -> Vec<Region> {
    let mut by_top = regions.to_vec();
    by_top.sort_by_key(|region| region.bounding_box.top);

    let mut rows: Vec<Vec<Region>> = Vec::new();
    for region in by_top {
        let joins_last_row = rows
            .last()
            .and_then(|row| row.first())
            .is_some_and(|anchor| {
                region.bounding_box.top - anchor.bounding_box.top <= row_tolerance
            });

        match rows.last_mut() {
            Some(row) if joins_last_row => row.push(region),
            _ => rows.push(vec![region]),
        }
    }

    rows.into_iter()
        .flat_map(|mut row| {
            row.sort_by_key(|region| region.bounding_box.left);
            row
        })
        .collect()
}
