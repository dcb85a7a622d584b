pub mod dispatch;
pub mod error;
pub mod lift;
pub mod sim;
pub mod viz;

#[cfg(test)]
mod test;
