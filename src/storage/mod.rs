mod in_memory;
mod on_disk;

pub(crate) use in_memory::*;
pub(crate) use on_disk::*;

#[cfg(test)]
mod tests;
