//! Package index shared by the unit tests

use reqmap_core::types::{PackageDescriptor, PackageIndex, SubPackage};

pub const LOCAL: &str = "/webjars/";
pub const CDN: &str = "http://cdn.jsdelivr.net/webjars/";

/// A small classpath worth of packages in both packaging conventions
pub fn webjars_index() -> PackageIndex {
    PackageIndex::new(vec![
        PackageDescriptor::classic("jquery", "2.1.0"),
        PackageDescriptor::classic("bootstrap", "3.1.1").with_dependency("jquery"),
        PackageDescriptor::manifest("angular-bootstrap", "0.13.0")
            .with_main("ui-bootstrap-tpls")
            .with_dependency("angular"),
        PackageDescriptor::manifest("angular", "1.4.4").with_main("angular"),
        PackageDescriptor::manifest("angular-schema-form", "0.8.2")
            .with_main("dist/schema-form")
            .with_dependency("angular")
            .with_dependency("objectpath"),
        PackageDescriptor::manifest("objectpath", "1.2.1").with_main("lib/ObjectPath"),
        PackageDescriptor::manifest("angular-pouchdb", "2.0.8")
            .with_main("dist/angular-pouchdb")
            .with_dependency("angular"),
        PackageDescriptor::manifest("validate.js", "0.8.0").with_main("validate"),
        PackageDescriptor::manifest("babel-runtime", "5.8.19"),
        PackageDescriptor::classic("when-node", "3.5.2")
            .with_sub_package(SubPackage::new("when", "when").with_main("when")),
        PackageDescriptor::manifest("angular", "1.3.15").with_main("angular"),
    ])
}
