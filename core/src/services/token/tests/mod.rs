mod cleanup_tests;
mod codec_tests;
