mod get_test;
mod patch_test;
