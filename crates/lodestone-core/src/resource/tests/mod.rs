pub mod state_tests;
