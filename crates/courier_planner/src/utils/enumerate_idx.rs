/// Pairs items with their position as a typed index, `TruckIdx` for the
/// n-th truck of the input, `CustomerIdx` for the n-th customer.
pub trait EnumerateIdx: Iterator + Sized {
    fn enumerate_idx<Idx: From<usize>>(self) -> impl Iterator<Item = (Idx, Self::Item)> {
        self.enumerate()
            .map(|(position, item)| (Idx::from(position), item))
    }
}

impl<I: Iterator> EnumerateIdx for I {}
