use phub_derive::phub_slice;
use std::fmt::Debug;

pub trait Source: Debug + Send + Sync {
    fn value(&self) -> u32;
}

#[derive(Debug)]
pub struct Fixed(u32);

impl Source for Fixed {
    fn value(&self) -> u32 {
        self.0
    }
}

#[phub_slice]
pub struct Reader<S: Source> {
    source: S,
    scale: u32,
}

impl<S: Source> Reader<S> {
    fn read(&self) -> u32 {
        self.source.value() * self.scale
    }
}

fn main() {
    let reader = Reader::new(ReaderInner { source: Fixed(7), scale: 3 });
    let shared = reader.clone();
    assert_eq!(shared.read(), 21);
    assert_eq!(reader.scale, 3);
}
