pub mod lighting;
