mod get_test;
