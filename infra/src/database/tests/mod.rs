mod mysql_store_tests;
