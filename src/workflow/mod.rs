pub mod create;
pub mod timelog;

#[cfg(test)]
mod testing;
