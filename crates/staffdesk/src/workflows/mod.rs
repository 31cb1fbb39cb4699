pub mod applications;
