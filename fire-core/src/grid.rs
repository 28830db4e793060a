//! Dense heat grids and the double buffer the diffusion pass ping-pongs between.

/// Heat of a single cell. Never negative; injection writes exactly the
/// configured maximum and diffusion cannot exceed its inputs.
pub type Heat = u32;

/// Row-major 2D grid of heat values with dimensions fixed at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeatField {
    width: usize,
    height: usize,
    cells: Vec<Heat>,
}

/// Aggregate figures over a field, used for logging and recording.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldStats {
    pub total: u64,
    pub peak: Heat,
    pub hot_cells: usize,
}

impl HeatField {
    pub fn new(width: usize, height: usize) -> HeatField {
        HeatField {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[Heat] {
        &self.cells
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Heat> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Writes one cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: Heat) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    // Hot-path read for callers that already iterate inside the bounds.
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> Heat {
        debug_assert!(x < self.width && y < self.height);
        self.cells[y * self.width + x]
    }

    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, value: Heat) {
        debug_assert!(x < self.width && y < self.height);
        self.cells[y * self.width + x] = value;
    }

    pub fn fill(&mut self, value: Heat) {
        self.cells.fill(value);
    }

    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Iterates `(x, y, heat)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Heat)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &h)| (i % w, i / w, h))
    }

    pub fn stats(&self) -> FieldStats {
        self.cells.iter().fold(FieldStats::default(), |mut s, &h| {
            s.total += u64::from(h);
            s.peak = s.peak.max(h);
            if h > 0 {
                s.hot_cells += 1;
            }
            s
        })
    }
}

/// The `previous` / `current` pair.
///
/// Diffusion reads `previous` and writes `current`; [`HeatBuffers::swap`]
/// then exchanges the two handles so the freshly computed field becomes the
/// next pass's source and the injection target. No cells are copied.
#[derive(Clone, Debug)]
pub struct HeatBuffers {
    previous: HeatField,
    current: HeatField,
}

impl HeatBuffers {
    pub fn new(width: usize, height: usize) -> HeatBuffers {
        HeatBuffers {
            previous: HeatField::new(width, height),
            current: HeatField::new(width, height),
        }
    }

    pub fn width(&self) -> usize {
        self.previous.width
    }

    pub fn height(&self) -> usize {
        self.previous.height
    }

    pub fn previous(&self) -> &HeatField {
        &self.previous
    }

    pub fn previous_mut(&mut self) -> &mut HeatField {
        &mut self.previous
    }

    pub fn current(&self) -> &HeatField {
        &self.current
    }

    /// Source and destination of a diffusion pass, borrowed together.
    pub fn split(&mut self) -> (&HeatField, &mut HeatField) {
        (&self.previous, &mut self.current)
    }

    pub fn swap(&mut self) {
        std::mem::swap(&mut self.previous, &mut self.current);
    }

    pub fn clear(&mut self) {
        self.previous.fill(0);
        self.current.fill(0);
    }
}
