use super::ColumnLayout;

/// Zero-based column indices of a headerless-by-position parcel export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalColumns {
    pub city: usize,
    pub number: usize,
    pub direction: usize,
    pub street: usize,
    pub suffix: usize,
    pub unit: usize,
    pub additional: Option<usize>,
    pub skip_header: bool,
}

impl Default for PositionalColumns {
    fn default() -> Self {
        PositionalColumns {
            city: 50,
            number: 6,
            direction: 7,
            street: 8,
            suffix: 9,
            unit: 15,
            additional: None,
            skip_header: true,
        }
    }
}

impl PositionalColumns {
    pub fn layout(&self) -> ColumnLayout {
        let widest = [
            self.city,
            self.number,
            self.direction,
            self.street,
            self.suffix,
            self.unit,
        ]
        .into_iter()
        .chain(self.additional)
        .max()
        .unwrap_or(0);

        ColumnLayout {
            city: vec![self.city],
            number: Some(self.number),
            additional: self.additional,
            direction: Some(self.direction),
            street: Some(self.street),
            suffix: Some(self.suffix),
            unit: Some(self.unit),
            min_len: widest.saturating_add(1),
        }
    }
}
