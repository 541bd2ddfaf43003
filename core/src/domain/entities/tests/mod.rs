mod reset_token_tests;
mod token_tests;
mod user_tests;
