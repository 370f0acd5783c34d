mod charts;
mod tables;

pub use charts::{format_requirement_chart, print_requirement_chart};
pub use tables::{
    format_field_table, format_products_table, format_summary_table, format_texture_table,
    format_zone_table, print_field_table, print_products_table, print_summary_table,
    print_texture_table, print_zone_table,
};
