pub mod dynamic_dca;
