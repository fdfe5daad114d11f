pub mod tle_server;
