/// Generates a service struct holding its dependencies as `Arc`s, plus a
/// `*Deps` trait bundling their concrete types.
///
/// ```ignore
/// gen_service_impl! {
///     struct BranchServiceImpl: BranchService = BranchServiceDeps {
///         BranchDao: dao::branch::BranchDao<Transaction = Self::Transaction> = branch_dao,
///     }
/// }
/// ```
/// Fields which are not services go into an optional `; custom_fields { .. }` block.
#[macro_export]
macro_rules! gen_service_impl {
    (
        struct $service_name:ident : $trait:path = $dependencies:ident {
            $($field_name:ident: $field_type:path = $field_attr:ident),* $(,)?
        }
        $(; custom_fields {
            $($custom_attr:ident: $custom_type:ty = $custom_name:ident),* $(,)?
        })?
    ) => {
            pub trait $dependencies {
                type Transaction: dao::Transaction + Send + Sync + Clone + std::fmt::Debug + 'static;
                $(
                    type $field_name: $field_type + Sync + Send;
                )*
            }

            pub struct $service_name<Deps: $dependencies> {
                $(
                    pub $field_attr: std::sync::Arc<Deps::$field_name>,
                )*
                $($(
                    pub $custom_attr: $custom_type,
                )*)?
            }
    };
}
