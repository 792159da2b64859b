pub mod results;
pub mod submissions;
pub mod workflows;
