mod generate;

pub use self::generate::run_generate;
