use crate::toolbar::custom_range::Bound;

/// Which calendar popover is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalendarPopover {
    #[default]
    Closed,
    Start,
    End,
}

impl CalendarPopover {
    /// The user clicked the input of `bound`.
    pub fn open(&mut self, bound: Bound) {
        *self = match bound {
            Bound::Start => CalendarPopover::Start,
            Bound::End => CalendarPopover::End,
        };
    }

    /// A click landed outside the open popover.
    pub fn click_outside(&mut self) {
        *self = CalendarPopover::Closed;
    }

    pub fn is_open(&self, bound: Bound) -> bool {
        self.open_bound() == Some(bound)
    }

    pub fn open_bound(&self) -> Option<Bound> {
        match self {
            CalendarPopover::Closed => None,
            CalendarPopover::Start => Some(Bound::Start),
            CalendarPopover::End => Some(Bound::End),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions() {
        let mut popover = CalendarPopover::default();
        assert_eq!(popover.open_bound(), None);

        popover.open(Bound::Start);
        assert!(popover.is_open(Bound::Start));
        assert!(!popover.is_open(Bound::End));

        popover.open(Bound::End);
        assert_eq!(popover, CalendarPopover::End);

        popover.click_outside();
        assert_eq!(popover, CalendarPopover::Closed);

        popover.click_outside();
        assert_eq!(popover, CalendarPopover::Closed);
    }
}
