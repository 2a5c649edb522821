use crate::error::{Error, Result};
use crate::Grid;

/// Board dimensions and how many mines to hide in it.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            height: 8,
            width: 8,
            mines: 8,
        }
    }
}
impl GameConfig {
    /// # Errors
    ///
    /// If the board has no cells, or no room for at least one safe cell.
    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "board must be at least 1x1 (got {}x{})",
                    self.height, self.width
                ),
            });
        }
        if self.mines >= self.height * self.width {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "{} mines leave no safe cell on a {}x{} board",
                    self.mines, self.height, self.width
                ),
            });
        }
        Ok(())
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.height, self.width)
    }
}
