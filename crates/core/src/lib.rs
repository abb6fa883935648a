pub mod shared {
    pub mod constants;
    pub mod diagnostic;
    pub mod video_metadata;
}

pub mod media {
    pub mod domain {
        pub mod frame_converter;
        pub mod media_error;
        pub mod media_source;
    }
    pub mod infrastructure;
}

pub mod canvas {
    pub mod domain {
        pub mod image_source;
        pub mod text_layout;
    }
    pub mod infrastructure;
}

pub mod sheet {
    pub mod domain {
        pub mod grid_schedule;
        pub mod header_info;
        pub mod layout;
        pub mod sheet_options;
    }
}

pub mod pipeline {
    pub mod batch_sheets_use_case;
    pub mod generate_sheet_use_case;
    pub mod sheet_error;
    pub mod sheet_logger;
}

#[cfg(test)]
pub(crate) mod test_support;
