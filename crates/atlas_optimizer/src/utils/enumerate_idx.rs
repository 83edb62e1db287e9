/// `enumerate()` yielding a typed index instead of a raw `usize`.
pub trait EnumerateIdx: Iterator + Sized {
    fn enumerate_idx<Idx>(self) -> impl Iterator<Item = (Idx, Self::Item)>
    where
        Idx: From<usize>,
    {
        self.enumerate().map(|(index, item)| (Idx::from(index), item))
    }
}

impl<I: Iterator> EnumerateIdx for I {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::job::JobIdx;

    #[test]
    fn test_enumerate_idx() {
        let items = ["a", "b", "c"];
        let indexed = items.iter().enumerate_idx::<JobIdx>().collect::<Vec<_>>();

        assert_eq!(indexed[0], (JobIdx::new(0), &"a"));
        assert_eq!(indexed[2], (JobIdx::new(2), &"c"));
    }
}
