pub mod supportdtos;
