mod module;
