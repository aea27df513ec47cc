//! Static code tables for the accessibility platform.
//!
//! Each table is one namespace; codes are unique within a namespace and the
//! ranges do not overlap apart from the shared `-1` sentinel.

pub(crate) const CONTROL_TYPES: &[(i32, &str)] = &[
    (-1, "Unknown"),
    (50000, "Button"),
    (50001, "Calendar"),
    (50002, "Checkbox"),
    (50003, "Combobox"),
    (50004, "Edit"),
    (50005, "Hyperlink"),
    (50006, "Image"),
    (50007, "Listitem"),
    (50008, "List"),
    (50009, "Menu"),
    (50010, "Menubar"),
    (50011, "Menuitem"),
    (50012, "Progressbar"),
    (50013, "Radiobutton"),
    (50014, "Scrollbar"),
    (50015, "Slider"),
    (50016, "Spinner"),
    (50017, "Statusbar"),
    (50018, "Tab"),
    (50019, "Tabitem"),
    (50020, "Text"),
    (50021, "Toolbar"),
    (50022, "Tooltip"),
    (50023, "Tree"),
    (50024, "Treeitem"),
    (50025, "Custom"),
    (50026, "Group"),
    (50027, "Thumb"),
    (50028, "Datagrid"),
    (50029, "Dataitem"),
    (50030, "Document"),
    (50031, "Splitbutton"),
    (50032, "Window"),
    (50033, "Pane"),
    (50034, "Header"),
    (50035, "Headeritem"),
    (50036, "Table"),
    (50037, "Titlebar"),
    (50038, "Separator"),
    (50039, "Semanticzoom"),
    (50040, "Appbar"),
];

pub(crate) const PROPERTIES: &[(i32, &str)] = &[
    (-1, "Unknown"),
    (30000, "RuntimeId"),
    (30001, "BoundingRectangle"),
    (30002, "ProcessId"),
    (30003, "ControlType"),
    (30004, "LocalizedControlType"),
    (30005, "Name"),
    (30006, "AcceleratorKey"),
    (30007, "AccessKey"),
    (30008, "HasKeyboardFocus"),
    (30009, "IsKeyboardFocusable"),
    (30010, "IsEnabled"),
    (30011, "AutomationId"),
    (30012, "ClassName"),
    (30013, "HelpText"),
    (30014, "ClickablePoint"),
    (30015, "Culture"),
    (30016, "IsControlElement"),
    (30017, "IsContentElement"),
    (30018, "LabeledBy"),
    (30019, "IsPassword"),
    (30020, "NativeWindowHandle"),
    (30021, "ItemType"),
    (30022, "IsOffscreen"),
    (30023, "Orientation"),
    (30024, "FrameworkId"),
    (30025, "IsRequiredForForm"),
    (30026, "ItemStatus"),
    (30027, "IsDockPatternAvailable"),
    (30028, "IsExpandCollapsePatternAvailable"),
    (30029, "IsGridItemPatternAvailable"),
    (30030, "IsGridPatternAvailable"),
    (30031, "IsInvokePatternAvailable"),
    (30032, "IsMultipleViewPatternAvailable"),
    (30033, "IsRangeValuePatternAvailable"),
    (30034, "IsScrollPatternAvailable"),
    (30035, "IsScrollItemPatternAvailable"),
    (30036, "IsSelectionItemPatternAvailable"),
    (30037, "IsSelectionPatternAvailable"),
    (30038, "IsTablePatternAvailable"),
    (30039, "IsTableItemPatternAvailable"),
    (30040, "IsTextPatternAvailable"),
    (30041, "IsTogglePatternAvailable"),
    (30042, "IsTransformPatternAvailable"),
    (30043, "IsValuePatternAvailable"),
    (30044, "IsWindowPatternAvailable"),
    (30045, "ValueValue"),
    (30046, "ValueIsReadOnly"),
    (30047, "RangeValueValue"),
    (30048, "RangeValueIsReadOnly"),
    (30049, "RangeValueMinimum"),
    (30050, "RangeValueMaximum"),
    (30051, "RangeValueLargeChange"),
    (30052, "RangeValueSmallChange"),
    (30053, "ScrollHorizontalScrollPercent"),
    (30054, "ScrollHorizontalViewSize"),
    (30055, "ScrollVerticalScrollPercent"),
    (30056, "ScrollVerticalViewSize"),
    (30057, "ScrollHorizontallyScrollable"),
    (30058, "ScrollVerticallyScrollable"),
    (30059, "SelectionSelection"),
    (30060, "SelectionCanSelectMultiple"),
    (30061, "SelectionIsSelectionRequired"),
    (30062, "GridRowCount"),
    (30063, "GridColumnCount"),
    (30064, "GridItemRow"),
    (30065, "GridItemColumn"),
    (30066, "GridItemRowSpan"),
    (30067, "GridItemColumnSpan"),
    (30068, "GridItemContainingGrid"),
    (30069, "DockDockPosition"),
    (30070, "ExpandCollapseExpandCollapseState"),
    (30071, "MultipleViewCurrentView"),
    (30072, "MultipleViewSupportedViews"),
    (30073, "WindowCanMaximize"),
    (30074, "WindowCanMinimize"),
    (30075, "WindowWindowVisualState"),
    (30076, "WindowWindowInteractionState"),
    (30077, "WindowIsModal"),
    (30078, "WindowIsTopmost"),
    (30079, "SelectionItemIsSelected"),
    (30080, "SelectionItemSelectionContainer"),
    (30081, "TableRowHeaders"),
    (30082, "TableColumnHeaders"),
    (30083, "TableRowOrColumnMajor"),
    (30084, "TableItemRowHeaderItems"),
    (30085, "TableItemColumnHeaderItems"),
    (30086, "ToggleToggleState"),
    (30087, "TransformCanMove"),
    (30088, "TransformCanResize"),
    (30089, "TransformCanRotate"),
    (30090, "IsLegacyIAccessiblePatternAvailable"),
    (30091, "LegacyIAccessibleChildId"),
    (30092, "LegacyIAccessibleName"),
    (30093, "LegacyIAccessibleValue"),
    (30094, "LegacyIAccessibleDescription"),
    (30095, "LegacyIAccessibleRole"),
    (30096, "LegacyIAccessibleState"),
    (30097, "LegacyIAccessibleHelp"),
    (30098, "LegacyIAccessibleKeyboardShortcut"),
    (30099, "LegacyIAccessibleSelection"),
    (30100, "LegacyIAccessibleDefaultAction"),
    (30101, "AriaRole"),
    (30102, "AriaProperties"),
    (30103, "IsDataValidForForm"),
    (30104, "ControllerFor"),
    (30105, "DescribedBy"),
    (30106, "FlowsTo"),
    (30107, "ProviderDescription"),
    (30108, "IsItemContainerPatternAvailable"),
    (30109, "IsVirtualizedItemPatternAvailable"),
    (30110, "IsSynchronizedInputPatternAvailable"),
];

pub(crate) const LANDMARKS: &[(i32, &str)] = &[
    (-1, "Unknown"),
    (80000, "Custom"),
    (80001, "Form"),
    (80002, "Main"),
    (80003, "Navigation"),
    (80004, "Search"),
];
