//! Fixture controller consumed by the generator tests.
//!
//! The doc comments are the data: each method carries the annotations a
//! documented endpoint would, and the tests point routes at them.

/// @group Group A
pub struct TestController;

impl TestController {
    pub fn dummy(&self) {}

    /// Example title.
    /// This will be the long description.
    /// It can also be multiple lines long.
    pub fn with_endpoint_description(&self) {}

    /// @bodyParam user_id integer required The id of the user.
    /// @bodyParam room_id string The id of the room.
    /// @bodyParam forever boolean Whether to ban the user forever.
    /// @bodyParam another_one number Just need something here.
    /// @bodyParam yet_another_param object required
    /// @bodyParam even_more_param array
    pub fn with_body_parameters(&self) {}

    /// @group Group B
    pub fn with_group_override(&self) {}

    /// @authenticated
    pub fn with_authenticated_tag(&self) {}

    /// @response {"id": 4, "name": "banana", "color": "red", "weight": "1 kg", "delicious": true}
    pub fn with_response_tag(&self) {}

    /// @transformer TestTransformer
    pub fn transformer_tag(&self) {}

    /// @transformer TestTransformer
    /// @transformermodel TestModel
    pub fn transformer_tag_with_model(&self) {}

    /// @transformercollection TestTransformer
    pub fn transformer_collection_tag(&self) {}

    /// @transformercollection TestTransformer
    /// @transformermodel TestModel
    pub fn transformer_collection_tag_with_model(&self) {}

    /// @transformer GhostTransformer
    pub fn with_unregistered_transformer(&self) {}

    pub fn with_handler_response(&self) {}

    pub fn with_dependencies(&self) {}

    pub fn with_failing_handler(&self) {}
}
