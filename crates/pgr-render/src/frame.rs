//! Logical grid backing one viewport's full-frame composition.
//!
//! A `Cell` stores the full grapheme cluster for leader cells along with its
//! visual width; continuation cells (width == 0) occupy the remaining
//! columns of a multi-column cluster and never print text. Every emission
//! path prints only leader clusters, exactly once.

use crate::attr::AttrRole;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const REVERSE     = 0b0000_0001;
        const CURSOR      = 0b0000_0010;
        /// Cosmetic-only: odd data record, dimmed a shade per
        /// `--highlight-odd-rec`. Never consulted by `attr::resolve`'s
        /// priority order, only by the terminal painter.
        const ODD_RECORD  = 0b0000_0100;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub cluster: String,
    pub width: u8,
    pub flags: CellFlags,
    pub attr: AttrRole,
}

impl Cell {
    pub fn leader(cluster: &str, width: u16, flags: CellFlags, attr: AttrRole) -> Self {
        Self {
            cluster: cluster.to_string(),
            width: width.max(1) as u8,
            flags,
            attr,
        }
    }

    pub fn continuation(flags: CellFlags, attr: AttrRole) -> Self {
        Self { cluster: String::new(), width: 0, flags, attr }
    }

    pub fn is_leader(&self) -> bool {
        self.width > 0
    }

    pub fn visual_width(&self) -> u16 {
        self.width as u16
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            cluster: " ".to_string(),
            width: 1,
            flags: CellFlags::empty(),
            attr: AttrRole::Data,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    pub fn set_cluster(&mut self, x: u16, y: u16, cluster: &str, width: u16, flags: CellFlags, attr: AttrRole) {
        if x >= self.width || y >= self.height {
            return;
        }
        let w = width.max(1).min(self.width - x);
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(cluster, w, flags, attr);
        }
        for dx in 1..w {
            if let Some(c_idx) = self.index(x + dx, y) {
                self.cells[c_idx] = Cell::continuation(flags, attr);
            }
        }
    }

    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (&str, u16, &Cell, u16)> {
        let width = self.width;
        let start = y as usize * width as usize;
        let mut x = 0u16;
        std::iter::from_fn(move || {
            while x < width {
                let idx = start + x as usize;
                let cell = &self.cells[idx];
                if cell.is_leader() {
                    let w = cell.visual_width();
                    let out = (cell.cluster.as_str(), w, cell, x);
                    x = x.saturating_add(w);
                    return Some(out);
                } else {
                    x += 1;
                }
            }
            None
        })
    }

    pub fn line_clusters(&self, y: u16) -> Vec<&str> {
        if y >= self.height {
            return Vec::new();
        }
        self.row_leaders(y).map(|(c, _, _, _)| c).collect()
    }

    pub fn cell_at(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_cluster_occupies_continuations() {
        let mut f = Frame::new(4, 1);
        f.set_cluster(0, 0, "中", 2, CellFlags::empty(), AttrRole::Data);
        assert!(f.cell_at(0, 0).unwrap().is_leader());
        assert!(!f.cell_at(1, 0).unwrap().is_leader());
        assert_eq!(f.line_clusters(0), vec!["中", " ", " "]);
    }
}
