use tracing::debug;

pub const TABLET_MIN_WIDTH: u32 = 768;
pub const DESKTOP_MIN_WIDTH: u32 = 1024;
pub const LARGE_DESKTOP_MIN_WIDTH: u32 = 1280;

/// Named viewport-width bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
    LargeDesktop,
}

impl Breakpoint {
    pub fn classify(width: u32) -> Self {
        if width >= LARGE_DESKTOP_MIN_WIDTH {
            Self::LargeDesktop
        } else if width >= DESKTOP_MIN_WIDTH {
            Self::Desktop
        } else if width >= TABLET_MIN_WIDTH {
            Self::Tablet
        } else {
            Self::Mobile
        }
    }

    /// Items per layout row
    pub fn chunk_size(self) -> usize {
        match self {
            Self::Mobile => 3,
            Self::Tablet => 4,
            Self::Desktop => 6,
            Self::LargeDesktop => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
            Self::LargeDesktop => "large-desktop",
        }
    }
}

/// Tracks the current breakpoint as the viewport is resized
#[derive(Debug, Clone, Copy)]
pub struct BreakpointObserver {
    width: u32,
    current: Breakpoint,
}

impl BreakpointObserver {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            current: Breakpoint::classify(width),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn current(&self) -> Breakpoint {
        self.current
    }

    pub fn chunk_size(&self) -> usize {
        self.current.chunk_size()
    }

    /// Reclassify on every resize. Returns the new breakpoint if it changed.
    pub fn on_resize(&mut self, width: u32) -> Option<Breakpoint> {
        self.width = width;
        let next = Breakpoint::classify(width);
        if next == self.current {
            return None;
        }
        debug!("Breakpoint {} -> {} at {}px", self.current.name(), next.name(), width);
        self.current = next;
        Some(next)
    }
}

/// Split items into rows sized for the breakpoint
pub fn chunk_listings<T: Clone>(items: &[T], breakpoint: Breakpoint) -> Vec<Vec<T>> {
    items
        .chunks(breakpoint.chunk_size())
        .map(<[T]>::to_vec)
        .collect()
}
